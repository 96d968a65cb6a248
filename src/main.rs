//! Entry point for the leaderboard form enhancements.
//! Mounts the run submission form and/or the profile form into whichever
//! host elements the server rendered on the page.

use gloo_utils::document;
use log::{info, warn};
use run_forms::{
    components::{
        initial_choice, render_preview, render_select, CharCounter, FlagImage, LookupIndicators, ScoreSection,
        SelectOption, SpeedSection,
    },
    config::{
        BIO_COUNTER, COMMENT_COUNTER, COUNTRY_IMAGE_ID, EDIT_PROFILE_ROOT_ID, INITIAL_CATEGORY,
        SPELUNKER_IMAGE_ID, SUBMIT_RUN_ROOT_ID,
    },
    hooks::{event_text, use_counted_text, use_linked_checkboxes, FormAction},
    lookup::fetch_lookup,
    utils::parse_category,
    Field, FormState, RunType,
};
use web_sys::Element;
use yew::prelude::*;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Callback writing an input's text into one form field.
fn field_input(form: &UseReducerHandle<FormState>, field: Field) -> Callback<InputEvent> {
    let form = form.clone();
    Callback::from(move |e: InputEvent| {
        if let Some(value) = event_text(&e) {
            form.dispatch(FormAction::SetField(field, value));
        }
    })
}

/// Start one lookup. Each completion is applied to whatever the form holds
/// at that point, so overlapping lookups resolve last-write-wins.
fn start_lookup(form: &UseReducerHandle<FormState>, run_type: RunType) -> Callback<MouseEvent> {
    let form = form.clone();
    Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        form.dispatch(FormAction::BeginLookup);
        let form = form.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = fetch_lookup(run_type).await;
            form.dispatch(FormAction::FinishLookup(run_type, outcome));
        });
    })
}

/// Parse a JSON list of options from a data attribute on the host element.
fn read_options(host: &Element, attribute: &str) -> Vec<SelectOption> {
    let Some(raw) = host.get_attribute(attribute) else {
        return Vec::new();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!("ignoring malformed {} on host element: {}", attribute, e);
        Vec::new()
    })
}

// ──────────────────────────────────────────────────────────────────────────────

#[derive(Properties, PartialEq)]
struct SubmitRunProps {
    categories: Vec<SelectOption>,
    spelunkers: Vec<SelectOption>,
    platforms: Vec<SelectOption>,
    spelunker: AttrValue,
    platform: AttrValue,
}

/// Run submission form with Steam autofill.
#[function_component(SubmitRunForm)]
fn submit_run_form(props: &SubmitRunProps) -> Html {
    let form = use_reducer(|| {
        FormState::with_selections(INITIAL_CATEGORY, props.spelunker.to_string(), props.platform.to_string())
    });
    let comment = use_counted_text(COMMENT_COUNTER, String::new());

    let on_category = {
        let form = form.clone();
        Callback::from(move |value: String| {
            form.dispatch(FormAction::SelectCategory(parse_category(&value)));
        })
    };
    let on_spelunker = {
        let form = form.clone();
        Callback::from(move |value: String| form.dispatch(FormAction::SetField(Field::Spelunker, value)))
    };
    let on_platform = {
        let form = form.clone();
        Callback::from(move |value: String| form.dispatch(FormAction::SetField(Field::Platform, value)))
    };

    html! {
        <form class="submit-run" method="post" action="/submit-run">
            <div class="steam-lookup">
                <button type="button" class="btn-secondary small" onclick={start_lookup(&form, RunType::Score)}>
                    { "Fetch best score run from Steam" }
                </button>
                <button type="button" class="btn-secondary small" onclick={start_lookup(&form, RunType::Speed)}>
                    { "Fetch best speed run from Steam" }
                </button>
                <LookupIndicators status={form.status} />
            </div>

            <div class="form-group">
                <label for="inputCategory">{ "Category:" }</label>
                { render_select("inputCategory", "category", &props.categories, &form.category, on_category) }
            </div>

            <ScoreSection
                visible={form.show_score_section}
                score={form.score.clone()}
                on_score={field_input(&form, Field::Score)}
            />
            <SpeedSection
                visible={form.show_speed_section}
                minutes={form.minutes.clone()}
                seconds={form.seconds.clone()}
                milliseconds={form.milliseconds.clone()}
                on_minutes={field_input(&form, Field::Minutes)}
                on_seconds={field_input(&form, Field::Seconds)}
                on_milliseconds={field_input(&form, Field::Milliseconds)}
            />

            <div class="form-group">
                <label>{ "Final level:" }</label>
                <input type="number" id="inputWorld" name="world" min="1" max="5"
                    value={form.world.clone()} oninput={field_input(&form, Field::World)} />
                { "-" }
                <input type="number" id="inputLevel" name="level" min="1" max="4"
                    value={form.floor.clone()} oninput={field_input(&form, Field::Floor)} />
            </div>

            <div class="form-group">
                <label for="inputSpelunker">{ "Spelunker:" }</label>
                { render_select("inputSpelunker", "spelunker", &props.spelunkers, &form.spelunker, on_spelunker) }
                <FlagImage id={SPELUNKER_IMAGE_ID} code={form.spelunker.clone()} alt="spelunker" />
            </div>

            <div class="form-group">
                <label for="inputPlatform">{ "Platform:" }</label>
                { render_select("inputPlatform", "platform", &props.platforms, &form.platform, on_platform) }
            </div>

            <div class="form-group">
                <label for="inputComment">{ "Comment:" }</label>
                <input type="text" id="inputComment" name="comment"
                    value={comment.text.clone()} oninput={comment.on_input.clone()} />
                <CharCounter id="counter" state={comment.counter}
                    limit={COMMENT_COUNTER.limit} color={comment.color} />
            </div>

            { render_preview(&form) }

            <button type="submit" class="btn-primary">{ "Submit run" }</button>
        </form>
    }
}

#[derive(Properties, PartialEq)]
struct EditProfileProps {
    countries: Vec<SelectOption>,
    country: AttrValue,
    bio: AttrValue,
    new_wr_email: bool,
}

/// Profile form: country flag preview, biography counter and the
/// world-record mail preferences.
#[function_component(EditProfileForm)]
fn edit_profile_form(props: &EditProfileProps) -> Html {
    let country = use_state(|| props.country.clone());
    let bio = use_counted_text(BIO_COUNTER, props.bio.to_string());
    let mail = use_linked_checkboxes(props.new_wr_email);

    let on_country = {
        let country = country.clone();
        Callback::from(move |value: String| country.set(AttrValue::from(value)))
    };

    html! {
        <form class="edit-profile" method="post" action="/edit-profile">
            <div class="form-group">
                <label for="inputCountry">{ "Country:" }</label>
                { render_select("inputCountry", "country", &props.countries, &country, on_country) }
                <FlagImage id={COUNTRY_IMAGE_ID} code={(*country).clone()} alt="flag" />
            </div>

            <div class="form-group">
                <label for="inputBio">{ "Biography:" }</label>
                <textarea id="inputBio" name="bio" value={bio.text.clone()} oninput={bio.on_input.clone()} />
                <CharCounter id="counter" state={bio.counter} limit={BIO_COUNTER.limit} color={bio.color} />
            </div>

            <div class="form-group checkboxes">
                <label>
                    <input type="checkbox" id="newwrCheckbox" name="newwr"
                        checked={mail.new_wr} onchange={mail.on_new_wr.clone()} />
                    { "Mail me when a new world record is set" }
                </label>
                <label>
                    <input type="checkbox" id="challengewrCheckbox" name="challengewr"
                        checked={mail.challenge.checked} disabled={mail.challenge.disabled}
                        onchange={mail.on_challenge.clone()} />
                    { "Include challenge categories" }
                </label>
            </div>

            <button type="submit" class="btn-primary">{ "Save profile" }</button>
        </form>
    }
}

/// Entry point: sets up logging and mounts each form whose host is present.
fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let doc = document();

    if let Some(host) = doc.get_element_by_id(SUBMIT_RUN_ROOT_ID) {
        info!("mounting run submission form");
        let spelunkers = read_options(&host, "data-spelunkers");
        let platforms = read_options(&host, "data-platforms");
        let props = SubmitRunProps {
            categories: read_options(&host, "data-categories"),
            spelunker: initial_choice(host.get_attribute("data-spelunker").as_deref(), &spelunkers).into(),
            platform: initial_choice(host.get_attribute("data-platform").as_deref(), &platforms).into(),
            spelunkers,
            platforms,
        };
        yew::Renderer::<SubmitRunForm>::with_root_and_props(host, props).render();
    }

    if let Some(host) = doc.get_element_by_id(EDIT_PROFILE_ROOT_ID) {
        info!("mounting profile form");
        let countries = read_options(&host, "data-countries");
        let props = EditProfileProps {
            country: initial_choice(host.get_attribute("data-country").as_deref(), &countries).into(),
            countries,
            bio: host.get_attribute("data-bio").unwrap_or_default().into(),
            new_wr_email: host.get_attribute("data-new-wr-email").as_deref() == Some("true"),
        };
        yew::Renderer::<EditProfileForm>::with_root_and_props(host, props).render();
    }
}
