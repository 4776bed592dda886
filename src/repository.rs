/// Represents a GitHub repository with owner and name components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    /// Creates a new Repository instance.
    ///
    /// # Arguments
    ///
    /// * `owner` - The repository owner (username or organization)
    /// * `name` - The repository name
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Returns the repository in "owner/repo" format.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Returns the owner component.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the name component.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Targets `branch` inside this repository.
    pub fn branch(&self, branch: impl Into<String>) -> RepositoryRef {
        RepositoryRef {
            repository: self.clone(),
            branch: branch.into(),
        }
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// The repository and branch a single rule operation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    repository: Repository,
    branch: String,
}

impl RepositoryRef {
    #[cfg(test)]
    pub fn new(owner: impl Into<String>, name: impl Into<String>, branch: impl Into<String>) -> Self {
        Repository::new(owner, name).branch(branch)
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn owner(&self) -> &str {
        self.repository.owner()
    }

    pub fn name(&self) -> &str {
        self.repository.name()
    }

    /// The branch name, which is also the pattern of the rule protecting it.
    pub fn branch(&self) -> &str {
        &self.branch
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.repository, self.branch)
    }
}
