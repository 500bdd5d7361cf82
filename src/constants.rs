/// Smallest accepted transaction magnitude
pub const MIN_TRANSACTION_AMOUNT: f64 = 0.01;

/// Budget alert threshold applied when none is supplied (percent)
pub const DEFAULT_ALERT_THRESHOLD: f64 = 80.0;

/// Milestone thresholds attached to every new goal (percent)
pub const DEFAULT_MILESTONE_STEPS: [f64; 4] = [25.0, 50.0, 75.0, 100.0];

/// Fallback icon for categories created without one
pub const DEFAULT_CATEGORY_ICON: &str = "\u{1F4C1}";

/// Fallback color for categories created without one
pub const DEFAULT_CATEGORY_COLOR: &str = "#808080";

/// Preference defaults for new users
pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_THEME: &str = "light";

/// Accepted preference values
pub const SUPPORTED_CURRENCIES: [&str; 3] = ["BRL", "USD", "EUR"];
pub const SUPPORTED_LANGUAGES: [&str; 3] = ["pt-BR", "en-US", "es-ES"];
pub const SUPPORTED_THEMES: [&str; 2] = ["light", "dark"];

/// Field length limits
pub const MAX_CATEGORY_NAME_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 200;
pub const MAX_NOTES_LEN: usize = 500;
pub const MAX_GOAL_TITLE_LEN: usize = 100;
pub const MAX_GOAL_DESCRIPTION_LEN: usize = 500;
pub const MAX_ICON_LEN: usize = 10;
pub const MAX_LABEL_LEN: usize = 50;
