//! Landing page: public marketing content and entry points into the app.

#[cfg(test)]
#[path = "landing_test.rs"]
mod landing_test;

use crate::router::View;

pub const TAGLINE: &str = "Document your journey, transform your life";
pub const INTRO: &str = "JournalMind helps you track your thoughts, mood patterns, and personal growth through intuitive journaling and powerful analytics.";

/// Onboarding steps, in order.
pub const STEPS: [&str; 3] = ["Create an account", "Write your first entry", "Build a journaling habit"];

/// Feature highlight: heading and one-line description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Feature {
    pub heading: &'static str,
    pub description: &'static str,
}

pub const FEATURES: [Feature; 3] = [
    Feature { heading: "No Limits", description: "Write as much as you want" },
    Feature { heading: "Auto-Saving", description: "Never lose your thoughts" },
    Feature { heading: "Multi-Device", description: "Access from anywhere" },
];

/// Static content of the landing view.
#[derive(Clone, Copy, Debug, Default)]
pub struct LandingPage;

impl LandingPage {
    /// Calls to action: signed-in visitors go straight to their journal.
    #[must_use]
    pub fn actions(authenticated: bool) -> Vec<View> {
        if authenticated { vec![View::Dashboard] } else { vec![View::Signup, View::Login] }
    }

    /// Plain-text rendering for terminal output.
    #[must_use]
    pub fn render(authenticated: bool) -> String {
        let mut out = format!("{TAGLINE}\n\n{INTRO}\n\nHow it works:\n");
        for (i, step) in STEPS.iter().enumerate() {
            out.push_str(&format!("  {}. {step}\n", i + 1));
        }
        out.push_str("\nFeatures:\n");
        for feature in &FEATURES {
            out.push_str(&format!("  - {}: {}\n", feature.heading, feature.description));
        }
        let actions: Vec<String> = Self::actions(authenticated).into_iter().map(|v| format!("{} ({v})", v.title())).collect();
        out.push_str(&format!("\nGet started: {}\n", actions.join(", ")));
        out
    }
}
