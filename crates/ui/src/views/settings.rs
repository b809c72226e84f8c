use dioxus::prelude::*;
use quiz_core::model::{ClassLevel, PreferencesError, QuizPreferences, QuizPreferencesDraft};
use services::PreferencesServiceError;
use tracing::warn;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::class_option_label;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SaveState {
    Idle,
    Saving,
    Saved,
    Error(ViewError),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct PreferencesForm {
    class_level: ClassLevel,
    base_url: String,
}

impl PreferencesForm {
    fn from_preferences(preferences: &QuizPreferences) -> Self {
        Self {
            class_level: preferences.class_level(),
            base_url: preferences.catalog_base_url().unwrap_or_default().to_string(),
        }
    }

    fn to_draft(&self) -> QuizPreferencesDraft {
        let draft = QuizPreferencesDraft::new(self.class_level);
        if self.base_url.trim().is_empty() {
            draft
        } else {
            draft.with_catalog_base_url(self.base_url.clone())
        }
    }
}

fn map_save_error(err: &PreferencesServiceError) -> ViewError {
    match err {
        PreferencesServiceError::Validation(PreferencesError::InvalidBaseUrl) => {
            ViewError::InvalidUrl
        }
        _ => ViewError::Unknown,
    }
}

#[component]
pub fn SettingsView() -> Element {
    let ctx = use_context::<AppContext>();
    let preferences = ctx.preferences();
    let preferences_for_resource = preferences.clone();

    let mut form = use_signal(PreferencesForm::default);
    let mut saved_form = use_signal(|| None::<PreferencesForm>);
    let mut save_state = use_signal(|| SaveState::Idle);

    let resource = use_resource(move || {
        let preferences = preferences_for_resource.clone();
        async move {
            preferences
                .load()
                .await
                .map_err(|_| ViewError::Unknown)
        }
    });
    let state = view_state_from_resource(&resource);

    use_effect(move || {
        let loaded = resource
            .value()
            .read()
            .as_ref()
            .and_then(|value| value.as_ref().ok())
            .map(PreferencesForm::from_preferences);
        if let Some(loaded) = loaded
            && saved_form.peek().is_none()
        {
            form.set(loaded.clone());
            saved_form.set(Some(loaded));
        }
    });

    let on_save = use_callback(move |()| {
        let preferences = preferences.clone();
        let draft = form.peek().to_draft();
        save_state.set(SaveState::Saving);
        spawn(async move {
            match preferences.save(draft).await {
                Ok(saved) => {
                    let saved = PreferencesForm::from_preferences(&saved);
                    form.set(saved.clone());
                    saved_form.set(Some(saved));
                    save_state.set(SaveState::Saved);
                }
                Err(err) => {
                    warn!(error = %err, "could not save preferences");
                    save_state.set(SaveState::Error(map_save_error(&err)));
                }
            }
        });
    });

    let form_value = form();
    let is_dirty = saved_form().is_some_and(|saved| saved != form_value);
    let status = save_state();
    let status_label = match status {
        SaveState::Saving => Some("Saving...".to_string()),
        SaveState::Saved => Some("Saved. The catalog source applies on next launch.".to_string()),
        SaveState::Error(err) => Some(err.message().to_string()),
        SaveState::Idle if is_dirty => Some("Unsaved changes".to_string()),
        SaveState::Idle => None,
    };
    let selected_class = form_value.class_level;
    let base_url = form_value.base_url.clone();

    rsx! {
        div { class: "page settings-page",
            header { class: "view-header",
                h2 { class: "view-title", "Settings" }
            }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "settings-status", "Loading preferences..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "quiz-error", "{err.message()}" }
                },
                ViewState::Ready(_) => rsx! {
                    form {
                        class: "settings-form",
                        onsubmit: move |evt| {
                            evt.prevent_default();
                            on_save.call(());
                        },
                        label { class: "settings-field",
                            span { class: "settings-field__label", "Default class" }
                            select {
                                class: "settings-select",
                                id: "settings-class",
                                value: "{selected_class}",
                                onchange: move |evt| {
                                    if let Ok(level) = evt.value().parse::<ClassLevel>() {
                                        form.write().class_level = level;
                                        save_state.set(SaveState::Idle);
                                    }
                                },
                                for (level, label) in ClassLevel::all().map(|level| (level, class_option_label(level))) {
                                    option {
                                        key: "{level}",
                                        value: "{level}",
                                        selected: level == selected_class,
                                        "{label}"
                                    }
                                }
                            }
                        }
                        label { class: "settings-field",
                            span { class: "settings-field__label", "Catalog base URL" }
                            input {
                                class: "settings-input",
                                id: "settings-base-url",
                                r#type: "url",
                                placeholder: "Built-in catalog",
                                value: "{base_url}",
                                oninput: move |evt| {
                                    form.write().base_url = evt.value();
                                    save_state.set(SaveState::Idle);
                                },
                            }
                            small { class: "settings-field__hint",
                                "Catalogs are fetched from <base>/<class>.json. Leave empty to use the built-in catalog."
                            }
                        }
                        div { class: "settings-actions",
                            button {
                                class: "btn btn-primary",
                                r#type: "submit",
                                disabled: !is_dirty || status == SaveState::Saving,
                                "Save"
                            }
                            if let Some(label) = status_label {
                                span { class: "settings-status", "{label}" }
                            }
                        }
                    }
                },
            }
        }
    }
}
