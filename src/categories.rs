use crate::api::ApiClient;
use crate::cascade::{DeleteCategoryRequest, DeletionCascade};
use crate::error::{ApiError, ApiResult};
use crate::models::{Category, CategoryStatus, CreateCategoryPayload, UpdateCategoryPayload};
use crate::tree::{CategoryNode, build_tree};
use crate::utils::{non_blank, validate_category_name};

/// Field values collected by the add/edit category forms.
///
/// `parent` is the whole desired placement: on an edit, `None` (or a blank
/// id) moves the category to the root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryForm {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<CategoryStatus>,
    pub parent: Option<String>,
    pub image: Option<String>,
}

impl CategoryForm {
    fn create_payload(&self) -> ApiResult<CreateCategoryPayload> {
        validate_category_name(&self.name)?;
        Ok(CreateCategoryPayload {
            name: self.name.trim().to_string(),
            description: non_blank(self.description.as_deref()),
            status: self.status,
            parent: non_blank(self.parent.as_deref()),
        })
    }

    fn update_payload(&self) -> ApiResult<UpdateCategoryPayload> {
        validate_category_name(&self.name)?;
        Ok(UpdateCategoryPayload {
            name: Some(self.name.trim().to_string()),
            description: non_blank(self.description.as_deref()),
            status: self.status,
            image: non_blank(self.image.as_deref()),
            parent: Some(non_blank(self.parent.as_deref())),
        })
    }
}

/// Read-through cache of the category list and the forest built from it.
///
/// Mutations take `&mut self`, so only one request per manager is ever in
/// flight. Every successful mutation refetches the full list.
pub struct CategoryManager {
    client: ApiClient,
    categories: Vec<Category>,
    forest: Vec<CategoryNode>,
    last_error: Option<String>,
}

impl CategoryManager {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            categories: Vec::new(),
            forest: Vec::new(),
            last_error: None,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn forest(&self) -> &[CategoryNode] {
        &self.forest
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn record<T>(&mut self, result: ApiResult<T>) -> ApiResult<T> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Ok(value)
            }
            Err(e) => {
                self.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Fetches the flat list and rebuilds the forest from scratch.
    pub async fn load(&mut self) -> ApiResult<()> {
        let result = self.client.get_categories().await;
        let categories = self.record(result)?;
        self.forest = build_tree(&categories);
        self.categories = categories;
        tracing::debug!(
            "loaded {} categories, {} roots",
            self.categories.len(),
            self.forest.len()
        );
        Ok(())
    }

    pub async fn create(&mut self, form: &CategoryForm) -> ApiResult<Category> {
        let result = match form.create_payload() {
            Ok(payload) => self.client.create_category(&payload).await,
            Err(e) => Err(e),
        };
        let created = self.record(result)?;
        tracing::info!("created category {} ({})", created.name, created.id);
        self.load().await?;
        Ok(created)
    }

    pub async fn update(&mut self, id: &str, form: &CategoryForm) -> ApiResult<Category> {
        let result = match form.update_payload() {
            Ok(payload) if matches!(&payload.parent, Some(Some(p)) if p == id) => Err(
                ApiError::Validation("A category cannot be its own parent".to_string()),
            ),
            Ok(payload) => self.client.update_category(id, &payload).await,
            Err(e) => Err(e),
        };
        let updated = self.record(result)?;
        tracing::info!("updated category {}", updated.id);
        self.load().await?;
        Ok(updated)
    }

    /// Confirms the cascade dialog and issues the single delete request.
    ///
    /// On failure the cached list is untouched and the message is recorded
    /// both here and inline on the dialog.
    pub async fn delete(&mut self, cascade: &mut DeletionCascade) -> ApiResult<Category> {
        let request: DeleteCategoryRequest = match cascade.confirm(&self.forest) {
            Ok(request) => request,
            Err(e) => return self.record(Err(e)),
        };

        let result = self
            .client
            .delete_category(&request.id, &request.payload)
            .await;

        if let Err(e) = self.record(result) {
            cascade.fail(e.user_message());
            return Err(e);
        }

        let deleted = cascade.succeed().ok_or_else(|| {
            ApiError::Validation("Delete finished without a pending category".to_string())
        })?;
        tracing::info!("deleted category {}", deleted.id);
        self.load().await?;
        Ok(deleted)
    }
}
