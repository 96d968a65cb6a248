use log::{debug, info, warn};
use std::fmt;
use std::str::FromStr;

pub mod components;
pub mod config;
pub mod dom;
pub mod hooks;
pub mod lookup;
pub mod utils;

use config::{DEFAULT_FLOOR, DEFAULT_PLATFORM, FLAG_IMAGE_DIR, FLAG_IMAGE_EXT, SCORE_CATEGORY, SPEED_CATEGORY};
use lookup::{LookupError, LookupResponse, LookupResult};

/// Integer identifying a run category. 0 means no run type selected,
/// 1 covers the score categories and everything else is a speed category.
pub type CategoryCode = i32;

/// The two disjoint run-submission modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunType {
    Score,
    Speed,
}

impl RunType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunType::Score => "score",
            RunType::Speed => "speed",
        }
    }
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "score" => Ok(RunType::Score),
            "speed" => Ok(RunType::Speed),
            other => Err(format!("Unknown run type: {}", other)),
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Category display

/// Which form sections a category shows, plus the defaults it writes into
/// the floor and world fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDisplay {
    pub show_score_section: bool,
    pub show_speed_section: bool,
    pub default_floor: u32,
    pub default_world: u32,
}

/// Map a category code to its section visibility and default world/floor.
///
/// Total over all integers: unlisted codes fall through to the speed
/// section with world 5.
pub fn apply_category(cat: CategoryCode) -> CategoryDisplay {
    let (show_score_section, show_speed_section) = match cat {
        0 => (false, false),
        1 => (true, false),
        _ => (false, true),
    };
    let default_world = match cat {
        11 => 3,
        2 | 4 | 5 | 9 | 12 | 13 | 15 => 4,
        _ => 5,
    };
    CategoryDisplay {
        show_score_section,
        show_speed_section,
        default_floor: DEFAULT_FLOOR,
        default_world,
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Duration and level decoding

/// A speed-run duration split into minutes, seconds and milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTime {
    pub minutes: u64,
    pub seconds: u64,
    pub milliseconds: u64,
}

impl RunTime {
    /// Decompose a millisecond count by successive integer division.
    pub fn from_ms(ms: u64) -> Self {
        let minutes = ms / 60_000;
        let remainder = ms - 60_000 * minutes;
        let seconds = remainder / 1_000;
        let milliseconds = remainder - 1_000 * seconds;
        RunTime {
            minutes,
            seconds,
            milliseconds,
        }
    }

    pub fn total_ms(&self) -> u64 {
        self.minutes * 60_000 + self.seconds * 1_000 + self.milliseconds
    }
}

impl fmt::Display for RunTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}:{:03}", self.minutes, self.seconds, self.milliseconds)
    }
}

/// Final position of a run, decoded from a one-based linear level index
/// where 1-1 is 1, 1-4 is 4 and 2-1 is 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelPosition {
    pub world: u32,
    pub floor: u32,
}

impl LevelPosition {
    /// Returns `None` for level 0, which has no position.
    pub fn from_level(level: u32) -> Option<Self> {
        let zero_based = level.checked_sub(1)?;
        Some(LevelPosition {
            world: zero_based / 4 + 1,
            floor: zero_based % 4 + 1,
        })
    }

    pub fn to_level(&self) -> u32 {
        (self.world - 1) * 4 + self.floor
    }
}

impl fmt::Display for LevelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.world, self.floor)
    }
}

/// Render a raw result the way the leaderboard lists it: a dollar amount
/// for score runs, `m:ss:mmm` for speed runs.
pub fn format_result(run_type: RunType, result: u64) -> String {
    match run_type {
        RunType::Score => format!("${}", result),
        RunType::Speed => RunTime::from_ms(result).to_string(),
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Small form helpers

/// Result of counting a text field against its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterState {
    pub count: usize,
    pub over_limit: bool,
}

/// One character-counter instance: its limit and the two colours it
/// switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterConfig {
    pub limit: usize,
    pub normal_color: &'static str,
    pub warning_color: &'static str,
}

impl CounterConfig {
    pub fn count(&self, text: &str) -> CounterState {
        update_counter(text, self.limit)
    }

    pub fn color(&self, state: &CounterState) -> &'static str {
        if state.over_limit {
            self.warning_color
        } else {
            self.normal_color
        }
    }
}

/// Count characters (Unicode scalar values) in `text`.
pub fn update_counter(text: &str, limit: usize) -> CounterState {
    // Browsers' `.length` counts UTF-16 units, so an emoji counts once here but twice there.
    let count = text.chars().count();
    CounterState {
        count,
        over_limit: count > limit,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckboxState {
    pub checked: bool,
    pub disabled: bool,
}

/// The challenge-WR mail checkbox follows the new-WR one and is locked
/// while the new-WR box is off.
pub fn sync_challenge_checkbox(new_wr_checked: bool) -> CheckboxState {
    CheckboxState {
        checked: new_wr_checked,
        disabled: !new_wr_checked,
    }
}

/// Image path for a flag (or spelunker) code. No check is made that the
/// asset exists.
pub fn flag_image_src(flag_code: &str) -> String {
    format!("{}{}{}", FLAG_IMAGE_DIR, flag_code, FLAG_IMAGE_EXT)
}

// ──────────────────────────────────────────────────────────────────────────────
// Submission form state

/// Where the lookup flow currently stands. Drives the working and error
/// indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupStatus {
    #[default]
    Idle,
    Pending,
    Failed,
    Filled,
}

impl LookupStatus {
    pub fn working_visible(&self) -> bool {
        matches!(self, LookupStatus::Pending)
    }

    pub fn error_visible(&self) -> bool {
        matches!(self, LookupStatus::Failed)
    }
}

/// Editable text fields of the submission form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Score,
    Minutes,
    Seconds,
    Milliseconds,
    Floor,
    World,
    Spelunker,
    Platform,
}

/// Field values of the run submission form, held as the text the inputs
/// display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    pub category: String,
    pub score: String,
    pub minutes: String,
    pub seconds: String,
    pub milliseconds: String,
    pub floor: String,
    pub world: String,
    pub spelunker: String,
    pub platform: String,
    pub show_score_section: bool,
    pub show_speed_section: bool,
    pub status: LookupStatus,
}

impl FormState {
    /// A fresh form with `cat` selected and nothing looked up.
    pub fn new(cat: CategoryCode) -> Self {
        let mut state = FormState::default();
        state.select_category(cat);
        state
    }

    /// A fresh form whose spelunker and platform match what the selectors
    /// show on load.
    pub fn with_selections(cat: CategoryCode, spelunker: String, platform: String) -> Self {
        FormState {
            spelunker,
            platform,
            ..FormState::new(cat)
        }
    }

    /// Apply a category picked in the selector: section visibility plus the
    /// default floor and world.
    pub fn select_category(&mut self, cat: CategoryCode) {
        let display = apply_category(cat);
        debug!("category {} selected: {:?}", cat, display);
        self.category = cat.to_string();
        self.show_score_section = display.show_score_section;
        self.show_speed_section = display.show_speed_section;
        self.floor = display.default_floor.to_string();
        self.world = display.default_world.to_string();
    }

    /// Run type implied by the visible section, if any.
    pub fn run_type(&self) -> Option<RunType> {
        if self.show_score_section {
            Some(RunType::Score)
        } else if self.show_speed_section {
            Some(RunType::Speed)
        } else {
            None
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Score => &self.score,
            Field::Minutes => &self.minutes,
            Field::Seconds => &self.seconds,
            Field::Milliseconds => &self.milliseconds,
            Field::Floor => &self.floor,
            Field::World => &self.world,
            Field::Spelunker => &self.spelunker,
            Field::Platform => &self.platform,
        }
    }

    /// Manual edit of one field.
    pub fn set_field(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Score => &mut self.score,
            Field::Minutes => &mut self.minutes,
            Field::Seconds => &mut self.seconds,
            Field::Milliseconds => &mut self.milliseconds,
            Field::Floor => &mut self.floor,
            Field::World => &mut self.world,
            Field::Spelunker => &mut self.spelunker,
            Field::Platform => &mut self.platform,
        };
        *slot = value;
    }

    /// Enter the pending state: working indicator on, error indicator off.
    pub fn begin_lookup(&mut self) {
        self.status = LookupStatus::Pending;
    }

    /// Apply the outcome of a lookup. Rejections and transport failures
    /// leave every run field untouched.
    pub fn finish_lookup(&mut self, run_type: RunType, outcome: Result<LookupResponse, LookupError>) {
        match outcome {
            Ok(LookupResponse::Found(result)) => self.fill(run_type, &result),
            Ok(LookupResponse::Rejected { error }) => {
                warn!("lookup for {} run rejected: {}", run_type, error);
                self.status = LookupStatus::Failed;
            }
            Err(e) => {
                warn!("lookup for {} run failed: {}", run_type, e);
                self.status = LookupStatus::Failed;
            }
        }
    }

    fn fill(&mut self, run_type: RunType, result: &LookupResult) {
        let position = result.position();
        match run_type {
            RunType::Score => {
                self.score = result.result.to_string();
                self.category = SCORE_CATEGORY.to_string();
                self.show_score_section = true;
                self.show_speed_section = false;
            }
            RunType::Speed => {
                let time = RunTime::from_ms(result.result);
                self.minutes = time.minutes.to_string();
                self.seconds = time.seconds.to_string();
                self.milliseconds = time.milliseconds.to_string();
                self.category = SPEED_CATEGORY.to_string();
                self.show_score_section = false;
                self.show_speed_section = true;
            }
        }
        self.floor = position.floor.to_string();
        self.world = position.world.to_string();
        self.spelunker = result.spelunker_id.clone();
        self.platform = DEFAULT_PLATFORM.to_string();
        self.status = LookupStatus::Filled;
        info!(
            "autofilled {} run: result {}, level {}, spelunker {}",
            run_type,
            format_result(run_type, result.result),
            position,
            result.spelunker_id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(id: &str, level: u32, result: u64) -> Result<LookupResponse, LookupError> {
        Ok(LookupResponse::Found(LookupResult {
            spelunker_id: id.to_string(),
            level,
            result,
        }))
    }

    #[test]
    fn duration_round_trips() {
        for ms in [0, 1, 999, 1_000, 59_999, 60_000, 125_340, 3_599_999, 86_400_123] {
            let t = RunTime::from_ms(ms);
            assert!(t.seconds < 60);
            assert!(t.milliseconds < 1000);
            assert_eq!(t.total_ms(), ms);
        }
    }

    #[test]
    fn duration_splits_example() {
        assert_eq!(
            RunTime::from_ms(125_340),
            RunTime {
                minutes: 2,
                seconds: 5,
                milliseconds: 340
            }
        );
        assert_eq!(RunTime::from_ms(125_340).to_string(), "2:05:340");
    }

    #[test]
    fn category_floor_is_always_four() {
        for cat in -3..40 {
            assert_eq!(apply_category(cat).default_floor, 4);
        }
    }

    #[test]
    fn category_worlds() {
        assert_eq!(apply_category(11).default_world, 3);
        assert_eq!(apply_category(2).default_world, 4);
        for cat in [4, 5, 9, 12, 13, 15] {
            assert_eq!(apply_category(cat).default_world, 4);
        }
        assert_eq!(apply_category(7).default_world, 5);
        assert_eq!(apply_category(0).default_world, 5);
        assert_eq!(apply_category(1).default_world, 5);
    }

    #[test]
    fn category_sections() {
        let none = apply_category(0);
        assert!(!none.show_score_section && !none.show_speed_section);
        let score = apply_category(1);
        assert!(score.show_score_section && !score.show_speed_section);
        let speed = apply_category(9);
        assert!(!speed.show_score_section && speed.show_speed_section);
    }

    #[test]
    fn level_decoding() {
        assert_eq!(LevelPosition::from_level(1), Some(LevelPosition { world: 1, floor: 1 }));
        assert_eq!(LevelPosition::from_level(4), Some(LevelPosition { world: 1, floor: 4 }));
        assert_eq!(LevelPosition::from_level(13), Some(LevelPosition { world: 4, floor: 1 }));
        assert_eq!(LevelPosition::from_level(0), None);
        let p = LevelPosition::from_level(5).unwrap();
        assert_eq!(p.to_string(), "2-1");
        assert_eq!(p.to_level(), 5);
    }

    #[test]
    fn counter_limits() {
        assert_eq!(update_counter("", 500), CounterState { count: 0, over_limit: false });
        assert!(update_counter(&"a".repeat(501), 500).over_limit);
        assert!(!update_counter(&"a".repeat(30), 30).over_limit);
        assert_eq!(update_counter("héllo", 30).count, 5);
    }

    #[test]
    fn counter_colors() {
        let cfg = config::COMMENT_COUNTER;
        assert_eq!(cfg.color(&cfg.count("short")), "black");
        assert_eq!(cfg.color(&cfg.count(&"x".repeat(31))), "red");
        assert_eq!(config::BIO_COUNTER.color(&config::BIO_COUNTER.count("bio")), "#333");
    }

    #[test]
    fn challenge_checkbox_follows_new_wr() {
        assert_eq!(sync_challenge_checkbox(true), CheckboxState { checked: true, disabled: false });
        assert_eq!(sync_challenge_checkbox(false), CheckboxState { checked: false, disabled: true });
    }

    #[test]
    fn flag_path() {
        assert_eq!(flag_image_src("se"), "/img/flags/se.png");
    }

    #[test]
    fn result_formatting() {
        assert_eq!(format_result(RunType::Score, 42), "$42");
        assert_eq!(format_result(RunType::Speed, 61_005), "1:01:005");
    }

    #[test]
    fn run_type_parsing() {
        assert_eq!("score".parse::<RunType>(), Ok(RunType::Score));
        assert_eq!("speed".parse::<RunType>(), Ok(RunType::Speed));
        assert!("time".parse::<RunType>().is_err());
    }

    #[test]
    fn manual_field_edits() {
        let mut state = FormState::new(2);
        state.set_field(Field::Seconds, "17".to_string());
        state.set_field(Field::Spelunker, "3".to_string());
        assert_eq!(state.field(Field::Seconds), "17");
        assert_eq!(state.spelunker, "3");
        assert_eq!(state.field(Field::World), "4");
    }

    #[test]
    fn run_type_follows_sections() {
        assert_eq!(FormState::new(0).run_type(), None);
        assert_eq!(FormState::new(1).run_type(), Some(RunType::Score));
        assert_eq!(FormState::new(13).run_type(), Some(RunType::Speed));
    }

    #[test]
    fn selections_seed_initial_state() {
        let state = FormState::with_selections(config::INITIAL_CATEGORY, "3".to_string(), "2".to_string());
        assert_eq!(state.spelunker, "3");
        assert_eq!(state.platform, "2");
        assert_eq!(flag_image_src(&state.spelunker), "/img/flags/3.png");
        assert_eq!(state.category, "1");
        assert!(state.show_score_section);
        assert_eq!(state.world, "5");
        assert_eq!(state.status, LookupStatus::Idle);
    }

    #[test]
    fn begin_lookup_shows_only_working() {
        let mut state = FormState::new(1);
        state.status = LookupStatus::Failed;
        state.begin_lookup();
        assert!(state.status.working_visible());
        assert!(!state.status.error_visible());
    }

    #[test]
    fn speed_lookup_fills_time_fields() {
        let mut state = FormState::new(1);
        state.begin_lookup();
        state.finish_lookup(RunType::Speed, found("abc", 13, 125_340));
        assert_eq!(state.floor, "1");
        assert_eq!(state.world, "4");
        assert_eq!(state.minutes, "2");
        assert_eq!(state.seconds, "5");
        assert_eq!(state.milliseconds, "340");
        assert_eq!(state.category, "2");
        assert!(state.show_speed_section);
        assert!(!state.show_score_section);
        assert_eq!(state.platform, "1");
        assert_eq!(state.spelunker, "abc");
        assert!(!state.status.working_visible());
        assert!(!state.status.error_visible());
    }

    #[test]
    fn score_lookup_fills_score_field() {
        let mut state = FormState::new(0);
        state.begin_lookup();
        state.finish_lookup(RunType::Score, found("xyz", 5, 42));
        assert_eq!(state.floor, "1");
        assert_eq!(state.world, "2");
        assert_eq!(state.score, "42");
        assert_eq!(state.category, "1");
        assert!(state.show_score_section);
        assert!(!state.show_speed_section);
        assert_eq!(state.status, LookupStatus::Filled);
    }

    #[test]
    fn rejected_lookup_leaves_fields() {
        for run_type in [RunType::Score, RunType::Speed] {
            let mut state = FormState::new(12);
            state.score = "7".to_string();
            let before = state.clone();
            state.begin_lookup();
            state.finish_lookup(
                run_type,
                Ok(LookupResponse::Rejected {
                    error: serde_json::json!("not found"),
                }),
            );
            assert!(state.status.error_visible());
            assert!(!state.status.working_visible());
            assert_eq!(FormState { status: before.status, ..state.clone() }, before);
        }
    }

    #[test]
    fn transport_failure_behaves_like_rejection() {
        let mut state = FormState::new(2);
        let before = state.clone();
        state.begin_lookup();
        state.finish_lookup(RunType::Speed, Err(LookupError::Timeout));
        assert_eq!(state.status, LookupStatus::Failed);
        assert_eq!(state.minutes, before.minutes);
        assert_eq!(state.world, before.world);
    }

    #[test]
    fn last_response_wins() {
        let mut state = FormState::new(1);
        state.begin_lookup();
        state.begin_lookup();
        state.finish_lookup(RunType::Score, found("first", 1, 10));
        state.finish_lookup(RunType::Speed, found("second", 20, 61_000));
        assert_eq!(state.spelunker, "second");
        assert_eq!(state.category, "2");
        assert_eq!(state.world, "5");
        assert_eq!(state.floor, "4");
    }
}
