//! Project management and selection

use super::*;

impl<S: StateStore> CommandExecutor<S> {
    /// Projects whose name or URL contains `search` (case-insensitive).
    pub fn list_projects(&self, search: &str) -> Vec<Project> {
        let needle = search.trim().to_lowercase();
        self.state
            .projects
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.url.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// A project by id, or the selected project when `id` is `None`.
    pub fn show_project(&self, id: Option<&str>) -> Result<&Project, LookupError> {
        match id {
            Some(id) => self.find_project(id),
            None => self
                .state
                .current_project()
                .ok_or_else(|| LookupError::ProjectNotFound("(none selected)".to_string())),
        }
    }

    pub fn add_project(&mut self, input: NewProject, now: DateTime<Utc>) -> Result<Project> {
        input.validate()?;
        let project = Project::from_new(input, 0, now);
        self.state.projects.push(project.clone());

        self.persist_projects()?;

        tracing::debug!(id = %project.id, name = %project.name, "added project");
        Ok(project)
    }

    /// Make `id` the selected project.
    pub fn select_project(&mut self, id: &str) -> Result<Project> {
        let project = self.find_project(id)?.clone();
        self.state.selected_project = Some(project.id.clone());

        self.storage
            .save_selected_project(&project.id)
            .context("Failed to save selected project")?;

        tracing::debug!(id = %project.id, "selected project");
        Ok(project)
    }
}
