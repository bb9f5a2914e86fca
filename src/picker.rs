use async_trait::async_trait;
use colored::Colorize;
use ibmi_project_explorer::host::{ProjectChoice, ProjectPicker};
use inquire::Select;
use tracing::warn;

/// Terminal prompt for choosing a project.
pub(crate) struct InquirePicker;

#[async_trait]
impl ProjectPicker for InquirePicker {
    fn report_error(&self, message: &str) {
        eprintln!("{}", message.red());
    }

    async fn pick(&self, candidates: Vec<ProjectChoice>) -> Option<ProjectChoice> {
        if candidates.is_empty() {
            return None;
        }

        let options: Vec<String> = candidates.iter().map(format_choice).collect();

        // The prompt blocks on stdin.
        let answer = tokio::task::spawn_blocking(move || {
            Select::new("Select a project:", options).raw_prompt()
        })
        .await;

        match answer {
            Ok(Ok(selected)) => candidates.into_iter().nth(selected.index),
            Ok(Err(e)) => {
                warn!("Project selection cancelled: {e}");
                None
            }
            Err(e) => {
                warn!("Project prompt failed: {e}");
                None
            }
        }
    }
}

fn format_choice(choice: &ProjectChoice) -> String {
    if choice.description.is_empty() {
        choice.label.clone()
    } else {
        format!("{} ({})", choice.label, choice.description)
    }
}
