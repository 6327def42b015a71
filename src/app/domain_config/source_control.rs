use serde::{Deserialize, Serialize};

/// Repository coordinates a domain dispatches its workflow to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceControlLink {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl Default for SourceControlLink {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            branch: "main".to_string(),
        }
    }
}

impl SourceControlLink {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            ..Self::default()
        }
    }

    /// `owner/repo`, the form stored on deployment records.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.trim(), self.repo.trim())
    }

    /// A dispatch needs at least an owner and a repository.
    pub fn is_complete(&self) -> bool {
        !self.owner.trim().is_empty() && !self.repo.trim().is_empty()
    }

    /// Branch to dispatch on, `main` when left blank.
    pub fn git_ref(&self) -> &str {
        let branch = self.branch.trim();
        if branch.is_empty() {
            "main"
        } else {
            branch
        }
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}", self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness_and_names() {
        let mut link = SourceControlLink::default();
        assert!(!link.is_complete());
        assert_eq!(link.git_ref(), "main");

        link.owner = "acme".to_string();
        link.repo = " infra ".to_string();
        link.branch = "   ".to_string();
        assert!(link.is_complete());
        assert_eq!(link.full_name(), "acme/infra");
        assert_eq!(link.git_ref(), "main");
        assert_eq!(link.html_url(), "https://github.com/acme/infra");
    }
}
