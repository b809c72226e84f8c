use std::path::PathBuf;

use dioxus::prelude::*;
use quiz_core::model::ClassLevel;
use services::ExportFormat;
use tracing::warn;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{FinalVm, QuestionVm, QuizVm, SidebarVm, class_option_label, load_quiz};

#[derive(Clone, Debug, PartialEq, Eq)]
enum ExportStatus {
    Saved(PathBuf),
    Failed,
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();
    let preferences = ctx.preferences();
    let badge_duration = quiz_loop.config().badge_duration();
    let export_dir = ctx.export_dir().to_path_buf();
    let file_opener = ctx.file_opener();

    let mut class_level = use_signal(|| ctx.initial_class());
    let vm = use_signal(|| None::<QuizVm>);
    let mut badge = use_signal(|| false);
    let mut export_status = use_signal(|| None::<ExportStatus>);

    let quiz_loop_for_resource = quiz_loop.clone();
    let mut resource = use_resource(move || {
        let quiz_loop = quiz_loop_for_resource.clone();
        let class_level = class_level();
        let mut vm = vm;

        async move {
            vm.set(None);
            let loaded = load_quiz(&quiz_loop, class_level).await?;
            vm.set(Some(loaded));
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let on_answer = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |option: String| {
            let mut vm = vm;
            let submitted = vm.write().as_mut().and_then(|vm| vm.submit(&option));
            let Some((correct, ticket)) = submitted else {
                return;
            };

            if correct {
                badge.set(true);
                spawn(async move {
                    tokio::time::sleep(badge_duration).await;
                    badge.set(false);
                });
            }

            // Tickets are bound to one session generation; a restart or a
            // class change in the meantime makes this advance a no-op.
            let quiz_loop = quiz_loop.clone();
            spawn(async move {
                quiz_loop.pause_before_advance().await;
                if let Some(vm) = vm.write().as_mut() {
                    vm.advance(&quiz_loop, ticket);
                }
            });
        })
    };

    let on_restart = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |_: ()| {
            let mut vm = vm;
            badge.set(false);
            export_status.set(None);
            if let Some(vm) = vm.write().as_mut()
                && let Err(err) = vm.restart(&quiz_loop)
            {
                warn!(?err, "could not restart quiz");
            }
        })
    };

    let on_class_change = use_callback(move |level: ClassLevel| {
        if class_level() == level {
            return;
        }
        class_level.set(level);
        badge.set(false);
        export_status.set(None);

        let preferences = preferences.clone();
        spawn(async move {
            if let Err(err) = preferences.select_class(level).await {
                warn!(%level, error = %err, "could not save class selection");
            }
        });
    });

    let on_export = use_callback(move |format: ExportFormat| {
        let rendered = vm.read().as_ref().map(|vm| vm.export(format));
        let Some(Ok(body)) = rendered else {
            export_status.set(Some(ExportStatus::Failed));
            return;
        };

        let path = export_dir.join(format.file_name());
        spawn(async move {
            match tokio::fs::write(&path, body).await {
                Ok(()) => export_status.set(Some(ExportStatus::Saved(path))),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "export failed");
                    export_status.set(Some(ExportStatus::Failed));
                }
            }
        });
    });

    let on_open = use_callback(move |path: PathBuf| file_opener.open_path(&path));

    let on_key = move |evt: KeyboardEvent| {
        let Key::Character(value) = evt.key() else {
            return;
        };
        let Some(index) = value.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) else {
            return;
        };
        let option = vm
            .read()
            .as_ref()
            .and_then(QuizVm::question)
            .filter(|question| !question.locked)
            .and_then(|question| question.options.get(index).map(|o| o.text.clone()));
        if let Some(option) = option {
            evt.prevent_default();
            on_answer.call(option);
        }
    };

    let vm_guard = vm.read();
    let sidebar = vm_guard.as_ref().map(QuizVm::sidebar);
    let question = vm_guard.as_ref().and_then(QuizVm::question);
    let final_vm = vm_guard.as_ref().and_then(QuizVm::final_screen);
    drop(vm_guard);

    let selected_class = class_level();
    let class_label = class_option_label(selected_class);
    let is_loading = matches!(state, ViewState::Loading);
    let show_badge = badge();
    let export_status_value = export_status();

    rsx! {
        div { class: "page quiz-page", id: "quiz-root", tabindex: "0", onkeydown: on_key,
            aside { class: "quiz-sidebar",
                h2 { class: "quiz-sidebar__title", "Physics Formula Quiz" }
                ClassPicker { selected: selected_class, disabled: is_loading, on_change: on_class_change }
                if let Some(sidebar) = sidebar {
                    ProgressPanel { sidebar }
                    button {
                        class: "btn btn-secondary quiz-sidebar__restart",
                        r#type: "button",
                        onclick: move |_| on_restart.call(()),
                        "Restart Quiz"
                    }
                }
            }
            section { class: "quiz-main",
                match state {
                    ViewState::Idle => rsx! {
                        p { "Idle" }
                    },
                    ViewState::Loading => rsx! {
                        p { class: "quiz-status", "Loading {class_label} catalog..." }
                    },
                    ViewState::Error(err) => rsx! {
                        p { class: "quiz-error", "{err.message()}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| resource.restart(),
                            "Retry"
                        }
                    },
                    ViewState::Ready(()) => rsx! {
                        if let Some(final_vm) = final_vm {
                            FinalScreen {
                                final_vm,
                                export_status: export_status_value,
                                on_restart,
                                on_export,
                                on_open,
                            }
                        } else if let Some(question) = question {
                            QuestionCard { question, show_badge, on_answer }
                        } else {
                            p { class: "quiz-status", "Preparing questions..." }
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn ClassPicker(selected: ClassLevel, disabled: bool, on_change: EventHandler<ClassLevel>) -> Element {
    rsx! {
        label { class: "quiz-class-picker",
            span { class: "quiz-class-picker__label", "Class" }
            select {
                class: "settings-select",
                value: "{selected}",
                disabled,
                onchange: move |evt| {
                    if let Ok(level) = evt.value().parse::<ClassLevel>() {
                        on_change.call(level);
                    }
                },
                for (level, label) in ClassLevel::all().map(|level| (level, class_option_label(level))) {
                    option {
                        key: "{level}",
                        value: "{level}",
                        selected: level == selected,
                        "{label}"
                    }
                }
            }
        }
    }
}

#[component]
fn ProgressPanel(sidebar: SidebarVm) -> Element {
    rsx! {
        div { class: "quiz-progress",
            p { class: "quiz-progress__catalog", "{sidebar.catalog_label}" }
            if let Some(notes) = sidebar.catalog_notes.as_ref() {
                p { class: "quiz-progress__notes", "{notes}" }
            }
            div { class: "quiz-progress__row",
                span { "Progress" }
                span { "{sidebar.progress_label}" }
            }
            div { class: "quiz-bar",
                div { class: "quiz-bar__fill", style: "width: {sidebar.progress_percent}%" }
            }
            div { class: "quiz-progress__row",
                span { "Score" }
                span { "{sidebar.score_label}" }
            }
            div { class: "quiz-bar quiz-bar--score",
                div { class: "quiz-bar__fill", style: "width: {sidebar.score_percent}%" }
            }
            p { class: "quiz-progress__pool", "{sidebar.pool_label}" }
        }
    }
}

#[component]
pub(crate) fn QuestionCard(
    question: QuestionVm,
    show_badge: bool,
    on_answer: EventHandler<String>,
) -> Element {
    let locked = question.locked;
    rsx! {
        article { class: "quiz-card",
            header { class: "quiz-card__meta",
                span { class: "quiz-card__number", "{question.number_label}" }
                span { class: "quiz-card__kind", "{question.kind_label}" }
                span { class: "quiz-card__chapter", "{question.chapter}" }
            }
            h3 { class: "quiz-card__prompt", "{question.prompt}" }
            if let Some(hint) = question.hint.as_ref() {
                p { class: "quiz-card__hint", "{hint}" }
            }
            div { class: "quiz-options",
                for (number, option) in question.options.iter().enumerate().map(|(i, o)| (i + 1, o)) {
                    button {
                        key: "{number}",
                        class: option.state.class(),
                        r#type: "button",
                        disabled: locked,
                        onclick: {
                            let text = option.text.clone();
                            move |_| on_answer.call(text.clone())
                        },
                        span { class: "quiz-option__index", "{number}" }
                        span { class: "quiz-option__text", "{option.text}" }
                    }
                }
            }
            if let Some(note) = question.placeholder_note.as_ref() {
                p { class: "quiz-card__note", "{note}" }
            }
            if show_badge {
                div { class: "quiz-badge", role: "status", "Excellent!" }
            }
        }
    }
}

#[component]
fn FinalScreen(
    final_vm: FinalVm,
    export_status: Option<ExportStatus>,
    on_restart: EventHandler<()>,
    on_export: EventHandler<ExportFormat>,
    on_open: EventHandler<PathBuf>,
) -> Element {
    let saved = match export_status.as_ref() {
        Some(ExportStatus::Saved(path)) => Some((path.clone(), path.display().to_string())),
        _ => None,
    };
    let export_failed = matches!(export_status, Some(ExportStatus::Failed));

    rsx! {
        FinalSummary { final_vm }
        div { class: "quiz-final__actions",
            button {
                class: "btn btn-primary",
                id: "quiz-restart",
                r#type: "button",
                onclick: move |_| on_restart.call(()),
                "Restart"
            }
            button {
                class: "btn btn-secondary",
                r#type: "button",
                onclick: move |_| on_export.call(ExportFormat::Json),
                "Export JSON"
            }
            button {
                class: "btn btn-secondary",
                r#type: "button",
                onclick: move |_| on_export.call(ExportFormat::Csv),
                "Export CSV"
            }
        }
        if let Some((path, label)) = saved {
            p { class: "quiz-final__export",
                "Saved to {label} "
                button {
                    class: "btn btn-link",
                    r#type: "button",
                    onclick: move |_| on_open.call(path.clone()),
                    "Open"
                }
            }
        }
        if export_failed {
            p { class: "quiz-error", "Export failed." }
        }
    }
}

#[component]
pub(crate) fn FinalSummary(final_vm: FinalVm) -> Element {
    rsx! {
        div { class: "quiz-final",
            h3 { class: "quiz-final__title", "Quiz complete" }
            p { class: "quiz-final__score", "{final_vm.score_label}" }
            p { class: "quiz-final__percentage", "{final_vm.percentage_label}" }
            p { class: "quiz-final__message", "{final_vm.message}" }
            if let Some(elapsed) = final_vm.elapsed_label.as_ref() {
                p { class: "quiz-final__elapsed", "Time: {elapsed}" }
            }
        }
    }
}
