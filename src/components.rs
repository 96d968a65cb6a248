//! Yew view components for the run submission and profile forms.
//!
//! Everything here renders from props; state lives in the forms in
//! `main.rs` and in [`crate::hooks`].

use crate::dom::update_flag_image;
use crate::utils::{position_from_fields, run_time_from_fields, validate_score};
use crate::{format_result, CounterState, FormState, LookupStatus, RunType};
use yew::prelude::*;

fn display(visible: bool) -> &'static str {
    if visible {
        ""
    } else {
        "display: none"
    }
}

/// Live character count for a text field.
#[derive(Properties, PartialEq)]
pub struct CharCounterProps {
    pub id: AttrValue,
    pub state: CounterState,
    pub limit: usize,
    pub color: &'static str,
}

#[function_component(CharCounter)]
pub fn char_counter(props: &CharCounterProps) -> Html {
    html! {
        <span class="char-counter">
            <span id={props.id.clone()} style={format!("color: {}", props.color)}>
                { props.state.count }
            </span>
            { format!(" / {}", props.limit) }
        </span>
    }
}

/// Image addressed by id whose source follows `code`.
#[derive(Properties, PartialEq)]
pub struct FlagImageProps {
    pub id: AttrValue,
    pub code: AttrValue,
    #[prop_or_default]
    pub alt: AttrValue,
}

#[function_component(FlagImage)]
pub fn flag_image(props: &FlagImageProps) -> Html {
    {
        let id = props.id.clone();
        use_effect_with(props.code.clone(), move |code| {
            if !code.is_empty() {
                update_flag_image(code, &id);
            }
            || ()
        });
    }

    html! {
        <img id={props.id.clone()} class="flag" alt={props.alt.clone()} />
    }
}

/// The "working" and "error" indicators of the lookup flow.
#[derive(Properties, PartialEq)]
pub struct LookupIndicatorsProps {
    pub status: LookupStatus,
}

#[function_component(LookupIndicators)]
pub fn lookup_indicators(props: &LookupIndicatorsProps) -> Html {
    html! {
        <div class="lookup-status">
            <div id="working" style={display(props.status.working_visible())}>
                { "Looking up your run…" }
            </div>
            <div id="error" class="input-error" style={display(props.status.error_visible())}>
                { "Could not find a run for your Steam account." }
            </div>
        </div>
    }
}

/// Score entry section.
#[derive(Properties, PartialEq)]
pub struct ScoreSectionProps {
    pub visible: bool,
    pub score: AttrValue,
    pub on_score: Callback<InputEvent>,
}

#[function_component(ScoreSection)]
pub fn score_section(props: &ScoreSectionProps) -> Html {
    let error = (!props.score.is_empty())
        .then(|| validate_score(&props.score).err())
        .flatten();
    html! {
        <div id="scorerun" class="form-group" style={display(props.visible)}>
            <label for="inputScore">{ "Score:" }</label>
            <input type="number" id="inputScore" name="score" min="0"
                value={props.score.clone()}
                class={if error.is_some() { "invalid" } else { "" }}
                oninput={props.on_score.clone()}
            />
            if let Some(err) = error {
                <div class="input-error">{ err }</div>
            }
        </div>
    }
}

/// Time entry section.
#[derive(Properties, PartialEq)]
pub struct SpeedSectionProps {
    pub visible: bool,
    pub minutes: AttrValue,
    pub seconds: AttrValue,
    pub milliseconds: AttrValue,
    pub on_minutes: Callback<InputEvent>,
    pub on_seconds: Callback<InputEvent>,
    pub on_milliseconds: Callback<InputEvent>,
}

#[function_component(SpeedSection)]
pub fn speed_section(props: &SpeedSectionProps) -> Html {
    let untouched =
        props.minutes.is_empty() && props.seconds.is_empty() && props.milliseconds.is_empty();
    let error = if untouched {
        None
    } else {
        run_time_from_fields(&props.minutes, &props.seconds, &props.milliseconds).err()
    };
    html! {
        <div id="speedrun" class="form-group" style={display(props.visible)}>
            <label>{ "Time:" }</label>
            <div class="time-inputs">
                <input type="number" id="inputMinutes" name="minutes" min="0"
                    value={props.minutes.clone()} oninput={props.on_minutes.clone()} />
                { ":" }
                <input type="number" id="inputSeconds" name="seconds" min="0" max="59"
                    value={props.seconds.clone()} oninput={props.on_seconds.clone()} />
                { ":" }
                <input type="number" id="inputMilliseconds" name="milliseconds" min="0" max="999"
                    value={props.milliseconds.clone()} oninput={props.on_milliseconds.clone()} />
            </div>
            if let Some(err) = error {
                <div class="input-error">{ err }</div>
            }
        </div>
    }
}

/// One-line summary of what the form would submit, in leaderboard format.
pub fn render_preview(form: &FormState) -> Html {
    let result = match form.run_type() {
        Some(RunType::Score) => validate_score(&form.score)
            .ok()
            .map(|s| format_result(RunType::Score, s)),
        Some(RunType::Speed) => run_time_from_fields(&form.minutes, &form.seconds, &form.milliseconds)
            .ok()
            .map(|t| format_result(RunType::Speed, t.total_ms())),
        None => None,
    };

    match (result, position_from_fields(&form.world, &form.floor)) {
        (Some(result), Ok(position)) => html! {
            <p class="run-preview">{ format!("{} (ended on {})", result, position) }</p>
        },
        (_, Err(err)) => html! { <p class="input-error">{ err }</p> },
        _ => html! {},
    }
}

/// One `<option>` of a server-provided selector.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Value a selector starts on: the server's preselected value when it names
/// one of the options, otherwise the first option the browser would show.
pub fn initial_choice(preselected: Option<&str>, options: &[SelectOption]) -> String {
    preselected
        .filter(|value| options.iter().any(|opt| opt.value == *value))
        .or_else(|| options.first().map(|opt| opt.value.as_str()))
        .unwrap_or_default()
        .to_string()
}

/// Render a `<select>` with `selected` marked, reporting the chosen value.
pub fn render_select(
    id: &'static str,
    name: &'static str,
    options: &[SelectOption],
    selected: &str,
    onchange: Callback<String>,
) -> Html {
    let onchange = onchange.reform(|e: Event| {
        e.target_unchecked_into::<web_sys::HtmlSelectElement>().value()
    });
    html! {
        <select id={id} name={name} {onchange}>
            { options.iter().map(|opt| html! {
                <option value={opt.value.clone()} selected={opt.value == selected}>
                    { opt.label.clone() }
                </option>
            }).collect::<Html>() }
        </select>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<SelectOption> {
        values
            .iter()
            .map(|v| SelectOption {
                value: v.to_string(),
                label: format!("Option {}", v),
            })
            .collect()
    }

    #[test]
    fn initial_choice_defaults_to_first_option() {
        assert_eq!(initial_choice(None, &options(&["0", "1", "2"])), "0");
    }

    #[test]
    fn initial_choice_keeps_known_preselection() {
        let opts = options(&["0", "1", "2"]);
        assert_eq!(initial_choice(Some("2"), &opts), "2");
        assert_eq!(initial_choice(Some("9"), &opts), "0");
    }

    #[test]
    fn initial_choice_without_options_is_empty() {
        assert_eq!(initial_choice(Some("4"), &[]), "");
    }
}
