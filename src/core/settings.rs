//! Tunable constants for every effect.
//!
//! The defaults reproduce the timings of the production site. The server may
//! override any subset from a JSON file; missing fields keep their default.

use serde::{Deserialize, Serialize};

use super::error::{EffectError, EffectResult};

/// Element id of the JSON `<script>` that carries settings to the client
pub const SETTINGS_ELEMENT_ID: &str = "feva-settings";

/// DOM event that asks the runtime to re-bind after a server-driven swap
pub const DEFAULT_REBIND_EVENT: &str = "feva:dom-replaced";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectSettings {
    pub roadmap: RoadmapSettings,
    pub rotation: RotationSettings,
    pub particles: ParticleSettings,
    pub matrix: MatrixSettings,
    pub theme: ThemeSettings,
    pub chrome: ChromeSettings,
    pub carousel: CarouselSettings,
    pub counter: CounterSettings,
    pub cards: CardSettings,
    /// Delay before re-binding after the host replaced page content
    pub rebind_delay_ms: u32,
    pub rebind_event: String,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            roadmap: RoadmapSettings::default(),
            rotation: RotationSettings::default(),
            particles: ParticleSettings::default(),
            matrix: MatrixSettings::default(),
            theme: ThemeSettings::default(),
            chrome: ChromeSettings::default(),
            carousel: CarouselSettings::default(),
            counter: CounterSettings::default(),
            cards: CardSettings::default(),
            rebind_delay_ms: 100,
            rebind_event: DEFAULT_REBIND_EVENT.to_string(),
        }
    }
}

impl EffectSettings {
    /// Parse and validate settings. Fields missing from `json` keep their
    /// default.
    pub fn from_json(json: &str) -> EffectResult<Self> {
        let settings: Self = serde_json::from_str(json).map_err(EffectError::InvalidSettings)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the effects cannot run with: probabilities outside
    /// `[0, 1]`, inverted ranges and degenerate sizes.
    pub fn validate(&self) -> EffectResult<()> {
        let matrix = &self.matrix;
        probability("matrix.column_chance", matrix.column_chance)?;
        probability("matrix.cell_chance", matrix.cell_chance)?;
        probability("matrix.highlight_chance", matrix.highlight_chance)?;
        ordered(
            "matrix.min_duration_s",
            matrix.min_duration_s,
            matrix.max_duration_s,
        )?;
        if matrix.min_cells > matrix.max_cells {
            return Err(out_of_range("matrix.min_cells", "greater than max_cells"));
        }
        if matrix.column_width < 1.0 {
            return Err(out_of_range("matrix.column_width", "must be at least 1px"));
        }

        let particles = &self.particles;
        ordered("particles.min_size", particles.min_size, particles.max_size)?;
        ordered(
            "particles.min_opacity",
            particles.min_opacity,
            particles.max_opacity,
        )?;
        ordered(
            "particles.min_lifetime_s",
            particles.min_lifetime_s,
            particles.max_lifetime_s,
        )?;
        if particles.min_lifetime_s < MIN_PARTICLE_LIFETIME_S {
            return Err(out_of_range("particles.min_lifetime_s", "must be at least 0.1s"));
        }
        if particles.max_drift_px < 0.0 {
            return Err(out_of_range("particles.max_drift_px", "must not be negative"));
        }

        ordered("rotation.min_x", self.rotation.min_x, self.rotation.max_x)
    }


    pub fn to_json(&self) -> String {
        // Plain data with string keys only, serialization cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// JSON safe to embed in a `<script>` element
    pub fn to_script_json(&self) -> String {
        self.to_json().replace("</", "<\\/")
    }
}

/// Shorter lifetimes would respawn particles many times within one frame
const MIN_PARTICLE_LIFETIME_S: f64 = 0.1;

fn out_of_range(field: &'static str, reason: &'static str) -> EffectError {
    EffectError::SettingOutOfRange { field, reason }
}

fn probability(field: &'static str, value: f64) -> EffectResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(out_of_range(field, "must be between 0 and 1"))
    }
}

/// `min..=max` must be a usable range
fn ordered(field: &'static str, min: f64, max: f64) -> EffectResult<()> {
    if min > max {
        return Err(out_of_range(field, "greater than the matching max"));
    }
    if !(max - min).is_finite() {
        return Err(out_of_range(field, "range too wide"));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadmapSettings {
    /// Intersection ratio above which a step starts revealing
    pub reveal_ratio: f64,
    /// Ratio at or above which the reveal settles without delay
    pub instant_ratio: f64,
    pub settle_delay_ms: u32,
    /// Early-trigger band for scroll-driven reveals
    pub scroll_tolerance: f64,
    /// Total stroke length of the progress line
    pub line_length: f64,
    pub step_line_duration_ms: u32,
    pub scroll_line_duration_ms: u32,
    pub title_delay_ms: u32,
    pub description_delay_ms: u32,
    pub title_speed_ms: u32,
    pub description_speed_ms: u32,
    /// Per-step CSS transition stagger, in seconds
    pub stagger_s: f64,
    pub pulse_animation: String,
}

impl Default for RoadmapSettings {
    fn default() -> Self {
        Self {
            reveal_ratio: 0.1,
            instant_ratio: 0.5,
            settle_delay_ms: 300,
            scroll_tolerance: 0.1,
            line_length: 2000.0,
            step_line_duration_ms: 1500,
            scroll_line_duration_ms: 100,
            title_delay_ms: 200,
            description_delay_ms: 800,
            title_speed_ms: 30,
            description_speed_ms: 25,
            stagger_s: 0.15,
            pulse_animation: "pulse 3s infinite".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    pub tick_ms: u32,
    pub step_deg: f64,
    pub drag_factor: f64,
    pub initial_x: f64,
    pub min_x: f64,
    pub max_x: f64,
    /// Fade-out time of the info panel before new text is swapped in
    pub info_swap_ms: u32,
    pub idle_name: String,
    pub idle_description: String,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            step_deg: 0.5,
            drag_factor: 0.5,
            initial_x: 10.0,
            min_x: -90.0,
            max_x: 90.0,
            info_swap_ms: 150,
            idle_name: "Hover over a technology".to_string(),
            idle_description: "Select a technology icon to learn more about our expertise."
                .to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub desktop_count: usize,
    pub mobile_count: usize,
    pub mobile_breakpoint: f64,
    pub min_size: f64,
    pub max_size: f64,
    pub min_opacity: f64,
    pub max_opacity: f64,
    pub min_lifetime_s: f64,
    pub max_lifetime_s: f64,
    pub max_drift_px: f64,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            desktop_count: 50,
            mobile_count: 30,
            mobile_breakpoint: 768.0,
            min_size: 2.0,
            max_size: 6.0,
            min_opacity: 0.1,
            max_opacity: 0.4,
            min_lifetime_s: 10.0,
            max_lifetime_s: 30.0,
            max_drift_px: 50.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixSettings {
    pub column_width: f64,
    pub tick_ms: u32,
    pub min_cells: usize,
    pub max_cells: usize,
    pub column_chance: f64,
    pub cell_chance: f64,
    pub highlight_chance: f64,
    pub max_delay_s: f64,
    pub min_duration_s: f64,
    pub max_duration_s: f64,
    pub rebuild_delay_ms: u32,
    pub charset: String,
}

impl Default for MatrixSettings {
    fn default() -> Self {
        Self {
            column_width: 20.0,
            tick_ms: 100,
            min_cells: 20,
            max_cells: 30,
            column_chance: 0.1,
            cell_chance: 0.3,
            highlight_chance: 0.1,
            max_delay_s: 2.0,
            min_duration_s: 3.0,
            max_duration_s: 5.0,
            rebuild_delay_ms: 100,
            charset: "01ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!@#$%^&*()_+-=[]{}|;:,.<>?"
                .to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub storage_key: String,
    pub transition_ms: u32,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            storage_key: "feva-theme".to_string(),
            transition_ms: 300,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeSettings {
    pub header_threshold: f64,
    pub back_to_top_threshold: f64,
    pub hero_parallax_speed: f64,
    pub icon_parallax_step: f64,
    pub icon_rotation_factor: f64,
    pub anchor_gap: f64,
    /// Widths above this close the mobile menu
    pub menu_breakpoint: f64,
    /// Header height assumed by host scroll commands when there is no header
    pub fallback_header_height: f64,
}

impl Default for ChromeSettings {
    fn default() -> Self {
        Self {
            header_threshold: 100.0,
            back_to_top_threshold: 500.0,
            hero_parallax_speed: 0.5,
            icon_parallax_step: 0.2,
            icon_rotation_factor: 0.1,
            anchor_gap: 20.0,
            menu_breakpoint: 768.0,
            fallback_header_height: 80.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselSettings {
    pub interval_ms: u32,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self { interval_ms: 5000 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterSettings {
    pub tick_ms: u32,
    pub steps: u32,
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            tick_ms: 30,
            steps: 50,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardSettings {
    /// How far a card starts below its resting place
    pub offset_px: f64,
    pub settle_delay_ms: u32,
    pub transition: String,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            offset_px: 20.0,
            settle_delay_ms: 100,
            transition: "all 0.6s cubic-bezier(0.4, 0, 0.2, 1)".to_string(),
        }
    }
}
