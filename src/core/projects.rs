use crate::core::tier::FREE_PROJECT_LIMIT;
use crate::domain::model::{NewProject, Project, ProjectUpdate};
use crate::domain::ports::{ProjectStore, SubscriptionStore};
use crate::utils::error::{BillingError, Result};

pub fn has_reached_limit(used: u32, limit: u32) -> bool {
    used >= limit
}

/// 已使用比例，四捨五入且上限 100
pub fn usage_percent(used: u32, limit: u32) -> u32 {
    if limit == 0 {
        return 100;
    }
    let percent = (f64::from(used) / f64::from(limit) * 100.0).round() as u32;
    percent.min(100)
}

pub struct ProjectService<P: ProjectStore, S: SubscriptionStore> {
    projects: P,
    subscriptions: S,
}

impl<P: ProjectStore, S: SubscriptionStore> ProjectService<P, S> {
    pub fn new(projects: P, subscriptions: S) -> Self {
        Self {
            projects,
            subscriptions,
        }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Project>> {
        self.projects.list_projects(user_id).await
    }

    pub async fn get(&self, id: &str) -> Result<Project> {
        self.projects
            .get_project(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, project: &NewProject) -> Result<Project> {
        if project.name.trim().is_empty() {
            return Err(BillingError::ValidationError {
                message: "Project name cannot be empty".to_string(),
            });
        }
        let created = self.projects.insert_project(project).await?;
        tracing::debug!("Created project {} for user {}", created.id, created.user_id);
        Ok(created)
    }

    /// 依目前訂閱的上限檢查後才建立；沒有訂閱時視為免費方案
    pub async fn create_within_quota(&self, project: &NewProject) -> Result<Project> {
        let limit = self.project_limit(&project.user_id).await?;
        let used = self.projects.count_projects(&project.user_id).await?;

        if has_reached_limit(used, limit) {
            tracing::info!(
                "User {} reached project limit ({}/{})",
                project.user_id,
                used,
                limit
            );
            return Err(BillingError::QuotaExceeded { limit });
        }

        self.create(project).await
    }

    pub async fn update(&self, id: &str, update: &ProjectUpdate) -> Result<Project> {
        if update.is_empty() {
            return self.get(id).await;
        }
        self.projects
            .update_project(id, update)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.projects.delete_project(id).await
    }

    /// 複製專案，新名稱加上 " (Copy)"，擁有者為 user_id
    pub async fn duplicate(&self, id: &str, user_id: &str) -> Result<Project> {
        let source = self.get(id).await?;
        let copy = NewProject {
            name: format!("{} (Copy)", source.name),
            description: source.description,
            image_url: source.image_url,
            user_id: user_id.to_string(),
        };
        self.projects.insert_project(&copy).await
    }

    pub async fn project_limit(&self, user_id: &str) -> Result<u32> {
        Ok(self
            .subscriptions
            .get_subscription(user_id)
            .await?
            .map(|s| s.project_limit)
            .unwrap_or(FREE_PROJECT_LIMIT))
    }
}

fn not_found(id: &str) -> BillingError {
    BillingError::NotFound {
        resource: format!("project {}", id),
    }
}
