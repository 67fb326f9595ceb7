//! Plot configuration shared across visualization modules
//!
//! Used by both the diagnostics (time) and profile (space) plots.

use crate::solver::SchemeKind;
use plotters::prelude::*;

/// Configuration for customizing plots
///
/// # Fields
///
/// - `width`, `height`: Dimensions in pixels
/// - `title`: Plot title
/// - `xlabel`, `ylabel`: Axis labels
/// - `scheme_colors`: Optional colors, indexed like [`SchemeKind::ALL`]
/// - `exact_color`: Color of the exact-solution curve
/// - `background`: Background color
/// - `line_width`: Line thickness in pixels
/// - `show_grid`: Whether to show grid lines
/// - `log_scale`: Logarithmic y axis (useful for diverging errors)
///
/// # Example
///
/// ```rust
/// use advect_rs::output::visualization::PlotConfig;
/// use plotters::prelude::*;
///
/// let mut config = PlotConfig::diagnostics("Error growth at C = 1.5");
/// config.log_scale = true;
/// config.width = 1920;
/// config.height = 1080;
/// config.scheme_colors = Some(vec![RED, BLUE, GREEN, MAGENTA, CYAN, BLACK]);
/// ```
#[derive(Clone)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1024)
    pub width: u32,

    /// Image height in pixels (default: 768)
    pub height: u32,

    /// Plot title (default: "Plot")
    pub title: String,

    /// X-axis label (default: auto-set by plot type)
    pub xlabel: String,

    /// Y-axis label (default: "u")
    pub ylabel: String,

    /// Optional per-scheme colors, in [`SchemeKind::ALL`] order
    ///
    /// If None or too short, the default palette is used.
    pub scheme_colors: Option<Vec<RGBColor>>,

    /// Exact solution color (default: BLACK)
    pub exact_color: RGBColor,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Line width in pixels (default: 2)
    pub line_width: u32,

    /// Show grid lines (default: true)
    pub show_grid: bool,

    /// Logarithmic y axis (default: false)
    pub log_scale: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Plot".to_string(),
            xlabel: String::new(), // Set by specific plot type
            ylabel: "u".to_string(),
            scheme_colors: None,
            exact_color: BLACK,
            background: WHITE,
            line_width: 2,
            show_grid: true,
            log_scale: false,
        }
    }
}

/// Helper trait to accept both `String` and `None` for optional titles
pub trait IntoOptionalTitle {
    fn into_optional_title(self) -> Option<String>;
}

impl IntoOptionalTitle for &str {
    fn into_optional_title(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoOptionalTitle for String {
    fn into_optional_title(self) -> Option<String> {
        Some(self)
    }
}

impl<T: IntoOptionalTitle> IntoOptionalTitle for Option<T> {
    fn into_optional_title(self) -> Option<String> {
        self.and_then(|t| t.into_optional_title())
    }
}

/// Constant for no title (default title will be used)
///
/// ```rust
/// use advect_rs::output::visualization::{PlotConfig, NO_TITLE};
///
/// let config = PlotConfig::profiles(NO_TITLE);
/// assert_eq!(config.title, "Field Profiles");
/// ```
pub const NO_TITLE: Option<&str> = None;

impl PlotConfig {
    /// Config for diagnostics over time
    ///
    /// Sets xlabel to "t" and title to custom value or "Diagnostics". The
    /// y label is chosen by the plotted series.
    pub fn diagnostics(title: impl IntoOptionalTitle) -> Self {
        Self {
            xlabel: "t".to_string(),
            ylabel: String::new(), // Set by the plotted series
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "Diagnostics".to_string()),
            ..Self::default()
        }
    }

    /// Config for spatial profiles at one snapshot
    ///
    /// Sets xlabel to "x" and title to custom value or "Field Profiles".
    pub fn profiles(title: impl IntoOptionalTitle) -> Self {
        Self {
            xlabel: "x".to_string(),
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "Field Profiles".to_string()),
            ..Self::default()
        }
    }

    /// Color of `kind`'s curves
    ///
    /// Uses custom colors if provided, otherwise falls back to the default
    /// palette. Colors are stable per scheme whatever the selection.
    pub(crate) fn scheme_color(&self, kind: SchemeKind) -> RGBColor {
        let index = SchemeKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or(0);

        if let Some(colors) = &self.scheme_colors {
            if let Some(color) = colors.get(index) {
                return *color;
            }
        }

        const PALETTE: [RGBColor; 6] = [
            RED,
            BLUE,
            GREEN,
            MAGENTA,
            RGBColor(255, 165, 0), // Orange
            RGBColor(128, 0, 128), // Purple
        ];

        PALETTE[index % PALETTE.len()]
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_config_default() {
        let config = PlotConfig::default();
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 768);
        assert!(config.show_grid);
        assert!(!config.log_scale);
    }

    #[test]
    fn test_diagnostics_config() {
        let config = PlotConfig::diagnostics(NO_TITLE);
        assert_eq!(config.xlabel, "t");
        assert_eq!(config.title, "Diagnostics");

        let config = PlotConfig::diagnostics(format!("C = {}", 0.8));
        assert_eq!(config.title, "C = 0.8");
    }

    #[test]
    fn test_profiles_config() {
        let config = PlotConfig::profiles("Final snapshot");
        assert_eq!(config.xlabel, "x");
        assert_eq!(config.title, "Final snapshot");
    }

    #[test]
    fn test_scheme_colors_are_distinct() {
        let config = PlotConfig::default();
        for (i, a) in SchemeKind::ALL.iter().enumerate() {
            for b in &SchemeKind::ALL[i + 1..] {
                assert_ne!(config.scheme_color(*a), config.scheme_color(*b));
            }
        }
        assert_eq!(config.scheme_color(SchemeKind::ALL[0]), RED);
    }

    #[test]
    fn test_custom_colors_fall_back_when_short() {
        let mut config = PlotConfig::default();
        config.scheme_colors = Some(vec![CYAN]);
        assert_eq!(config.scheme_color(SchemeKind::ALL[0]), CYAN);
        assert_eq!(config.scheme_color(SchemeKind::ALL[1]), BLUE);
    }
}
