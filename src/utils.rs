/// Formats an optional secret as `Some(...)` or `None`, never its value.
pub fn mask_fmt(secret: &Option<String>, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match secret {
        Some(_) => f.write_str("Some(...)"),
        None => f.write_str("None"),
    }
}

#[cfg(test)]
mod tests {
    use derivative::Derivative;

    #[derive(Derivative)]
    #[derivative(Debug)]
    struct WithSecret {
        #[derivative(Debug(format_with = "super::mask_fmt"))]
        key: Option<String>,
    }

    #[test]
    fn secrets_are_masked() {
        let set = WithSecret {
            key: Some("super-secret".to_string()),
        };
        let unset = WithSecret { key: None };

        assert!(!format!("{set:?}").contains("super-secret"));
        assert!(format!("{set:?}").contains("Some(...)"));
        assert!(format!("{unset:?}").contains("None"));
    }
}
