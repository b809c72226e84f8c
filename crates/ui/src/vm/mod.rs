mod quiz_vm;
mod time_fmt;

pub use quiz_vm::{
    FinalVm, OptionState, OptionVm, QuestionVm, QuizVm, SidebarVm, class_option_label, load_quiz,
};
pub use time_fmt::format_elapsed;
