use dioxus::prelude::*;
use quiz_core::model::{ClassLevel, QuizPreferencesDraft, Verdict};
use services::CatalogSource;
use storage::repository::{QuizPreferencesRepository, Storage};

use super::quiz::{FinalSummary, QuestionCard};
use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_storage};
use crate::vm::{FinalVm, OptionState, OptionVm, QuestionVm};

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_first_question() {
    let mut harness = setup_view_harness(ViewKind::Quiz, CatalogSource::Builtin);

    harness.rebuild();
    let html = harness
        .settle_until(|html| html.contains("Question 1 /"))
        .await;

    assert!(html.contains("Question 1 / 12"), "missing question label in {html}");
    assert!(html.contains("quiz-option"), "missing options in {html}");
    assert!(html.contains("Score"), "missing sidebar in {html}");
    assert!(html.contains("Class 11"), "missing class picker in {html}");
    assert!(html.contains("Restart Quiz"), "missing restart in {html}");
    assert!(
        html.contains("Class 11 · Loaded: 10 chapters"),
        "missing catalog line in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_reports_unavailable_catalog() {
    let missing = std::env::temp_dir().join("formula-quiz-view-smoke-missing");
    let mut harness = setup_view_harness(ViewKind::Quiz, CatalogSource::Directory(missing));

    harness.rebuild();
    let html = harness.settle_until(|html| html.contains("Retry")).await;

    assert!(
        html.contains("Could not load the formula catalog"),
        "missing error message in {html}"
    );
    assert!(html.contains("Retry"), "missing retry button in {html}");
    assert!(!html.contains("Question 1 /"), "question rendered in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn settings_view_smoke_renders_stored_url() {
    let storage = Storage::in_memory();
    let stored = QuizPreferencesDraft::new(ClassLevel::Class(9))
        .with_catalog_base_url("https://example.org/catalogs/")
        .validate()
        .unwrap();
    storage
        .preferences
        .save_preferences(&stored)
        .await
        .expect("save preferences");

    let mut harness =
        setup_view_harness_with_storage(ViewKind::Settings, CatalogSource::Builtin, storage);
    harness.rebuild();
    let html = harness
        .settle_until(|html| html.contains("https://example.org/catalogs/"))
        .await;

    assert!(html.contains("Catalog base URL"), "missing url field in {html}");
    assert!(
        html.contains("https://example.org/catalogs/"),
        "missing stored url in {html}"
    );
}

#[component]
fn AnsweredCard() -> Element {
    let question = QuestionVm {
        number_label: "Question 3 / 12".to_string(),
        kind_label: "Term meaning",
        chapter: "Gravitation".to_string(),
        prompt: "In g = GM/R^2, what does \"g\" represent?".to_string(),
        hint: None,
        options: vec![
            OptionVm {
                text: "acceleration due to gravity".to_string(),
                state: OptionState::Correct,
            },
            OptionVm {
                text: "mass of Earth".to_string(),
                state: OptionState::Wrong,
            },
            OptionVm {
                text: "radius".to_string(),
                state: OptionState::Muted,
            },
            OptionVm {
                text: "time period".to_string(),
                state: OptionState::Muted,
            },
        ],
        placeholder_note: Some("1 option is a placeholder: this catalog is too small.".to_string()),
        locked: true,
    };
    rsx! {
        QuestionCard { question, show_badge: true, on_answer: move |_| {} }
    }
}

#[test]
fn question_card_marks_answered_options() {
    let mut dom = VirtualDom::new(AnsweredCard);
    dom.rebuild_in_place();
    let html = dioxus_ssr::render(&dom);

    assert!(html.contains("quiz-option--correct"), "missing correct state in {html}");
    assert!(html.contains("quiz-option--wrong"), "missing wrong state in {html}");
    assert_eq!(html.matches("quiz-option--muted").count(), 2, "{html}");
    assert!(html.contains("Excellent!"), "missing badge in {html}");
    assert!(html.contains("Term meaning"), "missing kind in {html}");
    assert!(html.contains("1 option is a placeholder"), "missing placeholder note in {html}");
}

#[component]
fn CompletedSummary() -> Element {
    let final_vm = FinalVm {
        score_label: "9 / 12".to_string(),
        percentage_label: "75%".to_string(),
        message: Verdict::GoodEffort.message(),
        elapsed_label: Some("3:07".to_string()),
    };
    rsx! {
        FinalSummary { final_vm }
    }
}

#[test]
fn final_summary_renders_score_and_time() {
    let mut dom = VirtualDom::new(CompletedSummary);
    dom.rebuild_in_place();
    let html = dioxus_ssr::render(&dom);

    assert!(html.contains("9 / 12"), "missing score in {html}");
    assert!(html.contains("75%"), "missing percentage in {html}");
    assert!(html.contains("revise the weak areas"), "missing verdict in {html}");
    assert!(html.contains("Time: 3:07"), "missing elapsed time in {html}");
}
