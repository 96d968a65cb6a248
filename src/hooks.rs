use crate::lookup::{LookupError, LookupResponse};
use crate::{sync_challenge_checkbox, CategoryCode, CheckboxState, CounterConfig, CounterState, Field, FormState, RunType};
use std::rc::Rc;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

/// Every change the submission form can go through. All field writes pass
/// through [`FormState::reduce`].
pub enum FormAction {
    SelectCategory(CategoryCode),
    SetField(Field, String),
    BeginLookup,
    FinishLookup(RunType, Result<LookupResponse, LookupError>),
}

impl Reducible for FormState {
    type Action = FormAction;

    fn reduce(self: Rc<Self>, action: FormAction) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            FormAction::SelectCategory(cat) => next.select_category(cat),
            FormAction::SetField(field, value) => next.set_field(field, value),
            FormAction::BeginLookup => next.begin_lookup(),
            FormAction::FinishLookup(run_type, outcome) => next.finish_lookup(run_type, outcome),
        }
        Rc::new(next)
    }
}

/// Text of the element an input event fired on, for both `<input>` and
/// `<textarea>` targets.
pub fn event_text(e: &InputEvent) -> Option<String> {
    if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
        return Some(area.value());
    }
    e.target_dyn_into::<HtmlInputElement>().map(|input| input.value())
}

/// Holds the state and callback for a text field with a live character count.
#[derive(Clone)]
pub struct CountedText {
    /// The current text content of the field.
    pub text: String,
    pub counter: CounterState,
    /// Colour the count should be shown in.
    pub color: &'static str,
    /// Callback for the field's `oninput` event.
    pub on_input: Callback<InputEvent>,
}

#[hook]
pub fn use_counted_text(config: CounterConfig, initial: String) -> CountedText {
    let text = use_state(move || initial);

    let on_input = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = event_text(&e) {
                text.set(value);
            }
        })
    };

    let counter = config.count(&text);
    CountedText {
        text: (*text).clone(),
        counter,
        color: config.color(&counter),
        on_input,
    }
}

/// Pair of mail-notification checkboxes where the challenge box follows the
/// new-WR box.
#[derive(Clone)]
pub struct LinkedCheckboxes {
    pub new_wr: bool,
    pub challenge: CheckboxState,
    pub on_new_wr: Callback<Event>,
    pub on_challenge: Callback<Event>,
}

#[hook]
pub fn use_linked_checkboxes(new_wr_initial: bool) -> LinkedCheckboxes {
    let new_wr = use_state(move || new_wr_initial);
    let challenge = use_state(move || sync_challenge_checkbox(new_wr_initial));

    let on_new_wr = {
        let new_wr = new_wr.clone();
        let challenge = challenge.clone();
        Callback::from(move |e: Event| {
            let checked = e.target_unchecked_into::<HtmlInputElement>().checked();
            new_wr.set(checked);
            challenge.set(sync_challenge_checkbox(checked));
        })
    };

    let on_challenge = {
        let challenge = challenge.clone();
        Callback::from(move |e: Event| {
            let checked = e.target_unchecked_into::<HtmlInputElement>().checked();
            challenge.set(CheckboxState {
                checked,
                disabled: challenge.disabled,
            });
        })
    };

    LinkedCheckboxes {
        new_wr: *new_wr,
        challenge: *challenge,
        on_new_wr,
        on_challenge,
    }
}
