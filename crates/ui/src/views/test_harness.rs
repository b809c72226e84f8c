use std::path::{Path, PathBuf};
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::QuizConfig;
use quiz_core::model::ClassLevel;
use quiz_core::time::fixed_now;
use services::{CatalogService, CatalogSource, Clock, PreferencesService, QuizLoopService};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::platform::{FileOpenerRef, UiFileOpener};
use crate::views::{QuizView, SettingsView};

struct NoopOpener;

impl UiFileOpener for NoopOpener {
    fn open_path(&self, _path: &Path) {}
}

#[derive(Clone)]
struct TestApp {
    initial_class: ClassLevel,
    quiz_loop: Arc<QuizLoopService>,
    preferences: Arc<PreferencesService>,
}

impl UiApp for TestApp {
    fn initial_class(&self) -> ClassLevel {
        self.initial_class
    }

    fn export_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn preferences(&self) -> Arc<PreferencesService> {
        Arc::clone(&self.preferences)
    }

    fn file_opener(&self) -> FileOpenerRef {
        Arc::new(NoopOpener)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Quiz,
    Settings,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Quiz => rsx! { QuizView {} },
        ViewKind::Settings => rsx! { SettingsView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive pending work until `done` holds for the rendered html.
    pub async fn settle_until(&mut self, done: impl Fn(&str) -> bool) -> String {
        let mut html = self.render();
        for _ in 0..20 {
            if done(&html) {
                break;
            }
            self.drive_async().await;
            html = self.render();
        }
        html
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, source: CatalogSource) -> ViewHarness {
    setup_view_harness_with_storage(view, source, Storage::in_memory())
}

pub fn setup_view_harness_with_storage(
    view: ViewKind,
    source: CatalogSource,
    storage: Storage,
) -> ViewHarness {
    let quiz_loop = Arc::new(QuizLoopService::new(
        Clock::fixed(fixed_now()),
        QuizConfig::quick(),
        CatalogService::new(source),
    ));
    let preferences = Arc::new(PreferencesService::new(Arc::clone(&storage.preferences)));

    let app = Arc::new(TestApp {
        initial_class: ClassLevel::Class(11),
        quiz_loop,
        preferences,
    });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness { dom, storage }
}
