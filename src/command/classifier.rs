//! Transcript classification
//!
//! Maps a transcript to an [`Intent`] using ordered substring rules.
//! The first matching rule wins, so earlier phrases shadow later ones
//! ("good morning, stop" is a greeting, not an exit).

use super::greeting::Period;

/// Outcome of one speech capture attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript {
    /// Recognized speech, lowercase
    Heard(String),
    /// Nobody spoke before the listen timeout
    Timeout,
    /// Audio was captured but could not be recognized
    Unintelligible,
    /// The recognition backend could not be reached
    ServiceUnavailable,
}

impl Transcript {
    /// Build a transcript from recognized text, normalizing case
    pub fn heard(text: impl AsRef<str>) -> Self {
        Transcript::Heard(text.as_ref().to_lowercase())
    }

    /// Message spoken back for a failed capture, `None` for real speech
    pub fn sentinel_message(&self) -> Option<&'static str> {
        match self {
            Transcript::Heard(_) => None,
            Transcript::Timeout => Some("No speech detected."),
            Transcript::Unintelligible => Some("Sorry, I did not understand that."),
            Transcript::ServiceUnavailable => Some("Sorry, the speech service is down."),
        }
    }
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Greeting(Period),
    OpenApp,
    CloseApp,
    PlayMusic,
    Exit,
    /// Anything unrecognized, repeated back verbatim
    Echo(String),
}

/// Classify a transcript. Total over every input.
pub fn classify(transcript: &Transcript) -> Intent {
    let text = match transcript {
        Transcript::Heard(text) => text.as_str(),
        sentinel => {
            // Failed captures never reach the rules
            let message = sentinel.sentinel_message().unwrap_or_default();
            return Intent::Echo(message.to_string());
        }
    };

    // First match wins
    if text.contains("morning") {
        Intent::Greeting(Period::Morning)
    } else if text.contains("afternoon") {
        Intent::Greeting(Period::Afternoon)
    } else if text.contains("evening") {
        Intent::Greeting(Period::Evening)
    } else if text.contains("open notepad") {
        Intent::OpenApp
    } else if text.contains("close notepad") {
        Intent::CloseApp
    } else if text.contains("play music") {
        Intent::PlayMusic
    } else if text.contains("exit") || text.contains("stop") {
        Intent::Exit
    } else {
        Intent::Echo(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_text(text: &str) -> Intent {
        classify(&Transcript::heard(text))
    }

    #[test]
    fn test_greetings() {
        assert_eq!(classify_text("good morning"), Intent::Greeting(Period::Morning));
        assert_eq!(classify_text("good afternoon"), Intent::Greeting(Period::Afternoon));
        assert_eq!(classify_text("good evening"), Intent::Greeting(Period::Evening));
    }

    #[test]
    fn test_app_commands() {
        assert_eq!(classify_text("please open notepad"), Intent::OpenApp);
        assert_eq!(classify_text("close notepad now"), Intent::CloseApp);
        assert_eq!(classify_text("play music"), Intent::PlayMusic);
    }

    #[test]
    fn test_exit_and_stop() {
        assert_eq!(classify_text("exit"), Intent::Exit);
        assert_eq!(classify_text("stop listening"), Intent::Exit);
        // Substring match, not word match
        assert_eq!(classify_text("nonstop"), Intent::Exit);
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            classify_text("please stop playing morning music"),
            Intent::Greeting(Period::Morning)
        );
        assert_eq!(classify_text("stop the music"), Intent::Exit);
        assert_eq!(classify_text("play music and exit"), Intent::PlayMusic);
        assert_eq!(classify_text("open notepad then close notepad"), Intent::OpenApp);
    }

    #[test]
    fn test_echo_fallback() {
        assert_eq!(
            classify_text("What's the weather"),
            Intent::Echo("what's the weather".to_string())
        );
        assert_eq!(classify_text(""), Intent::Echo(String::new()));
    }

    #[test]
    fn test_heard_is_lowercased() {
        assert_eq!(classify_text("OPEN NOTEPAD"), Intent::OpenApp);
    }

    #[test]
    fn test_sentinels_bypass_rules() {
        assert_eq!(
            classify(&Transcript::Timeout),
            Intent::Echo("No speech detected.".to_string())
        );
        assert_eq!(
            classify(&Transcript::Unintelligible),
            Intent::Echo("Sorry, I did not understand that.".to_string())
        );
        assert_eq!(
            classify(&Transcript::ServiceUnavailable),
            Intent::Echo("Sorry, the speech service is down.".to_string())
        );
    }
}
