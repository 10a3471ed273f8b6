use super::LearnerProfile;

pub fn recommendation(book_title: &str, profile: &LearnerProfile) -> String {
    format!(
        "The user wants to learn about \"{topic}\".\n\
         Current understanding: {current}\n\
         Target understanding: {target}\n\
         Other considerations: {constraints}\n\
         \n\
         The following book has been recommended:\n\
         Title: {book_title}\n\
         \n\
         Briefly explain why this book is a good fit for the user.",
        topic = profile.topic,
        current = profile.current_level,
        target = profile.target_level,
        constraints = profile.constraints,
    )
}

pub fn reading_list(topic: &str, tone: &str, max_chars: u32) -> String {
    format!(
        "I want to learn about {topic}. \
         Recommend three books as a ranked list and give a reason for each. \
         Keep the answer within {max_chars} characters. \
         Write it as {tone}."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_prompt_contains_every_field() {
        let profile = LearnerProfile {
            topic: "Psychology".into(),
            current_level: "Beginner".into(),
            target_level: "Can discuss research papers".into(),
            constraints: "No English-language books".into(),
        };

        let prompt = recommendation("Thinking, Fast and Slow", &profile);

        for expected in [
            "Psychology",
            "Beginner",
            "Can discuss research papers",
            "No English-language books",
            "Thinking, Fast and Slow",
        ] {
            assert!(prompt.contains(expected), "missing {expected:?} in {prompt}");
        }
    }

    #[test]
    fn reading_list_prompt_carries_the_limit() {
        let prompt = reading_list("Rust", "a concise, easy-to-follow text", 800);

        assert!(prompt.contains("Rust"));
        assert!(prompt.contains("800 characters"));
        assert!(prompt.contains("a concise, easy-to-follow text"));
    }
}
