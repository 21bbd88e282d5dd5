//! User-facing status messages.

/// Colour tier of an inline message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Success,
    /// Partial success: the primary action worked, a follow-up did not.
    Warning,
    Failure,
}

/// A message the presentation layer shows after an action.
///
/// `blocking` notices interrupt the user (precondition failures); everything
/// else renders inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub tier: Tier,
    pub text: String,
    pub blocking: bool,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self::inline(Tier::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::inline(Tier::Warning, text)
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self::inline(Tier::Failure, text)
    }

    /// Blocking precondition message.
    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            tier: Tier::Failure,
            text: text.into(),
            blocking: true,
        }
    }

    fn inline(tier: Tier, text: impl Into<String>) -> Self {
        Self {
            tier,
            text: text.into(),
            blocking: false,
        }
    }
}
