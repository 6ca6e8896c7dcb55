//! Confirmation flow for deleting a category that may own products and
//! subcategories.
//!
//! `Idle -> Confirming -> Submitting -> Idle`, with a failed submit falling
//! back to `Confirming` so the user can adjust and retry.

use crate::error::{ApiError, ApiResult};
use crate::models::{Category, DeleteCategoryPayload, Disposition};
use crate::tree::CategoryNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependentGroup {
    Products,
    Subcategories,
}

impl DependentGroup {
    pub fn label(&self) -> &'static str {
        match self {
            DependentGroup::Products => "products",
            DependentGroup::Subcategories => "subcategories",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingDelete {
    pub category: Category,
    pub descendant_ids: Vec<String>,
    pub products: Disposition,
    pub subcategories: Disposition,
    /// Inline message from the last failed confirm or submit.
    pub error: Option<String>,
}

impl PendingDelete {
    fn disposition(&self, group: DependentGroup) -> &Disposition {
        match group {
            DependentGroup::Products => &self.products,
            DependentGroup::Subcategories => &self.subcategories,
        }
    }

    fn disposition_mut(&mut self, group: DependentGroup) -> &mut Disposition {
        match group {
            DependentGroup::Products => &mut self.products,
            DependentGroup::Subcategories => &mut self.subcategories,
        }
    }

    fn has_subcategories(&self) -> bool {
        !self.descendant_ids.is_empty()
    }

    fn excludes(&self, id: &str, group: DependentGroup) -> bool {
        if id == self.category.id {
            return true;
        }
        let subtree_goes_away = match group {
            // Moving subcategories under their own descendants would form a cycle.
            DependentGroup::Subcategories => true,
            DependentGroup::Products => self.subcategories == Disposition::DeleteAll,
        };
        subtree_goes_away && self.descendant_ids.iter().any(|d| d == id)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CascadeState {
    #[default]
    Idle,
    Confirming(PendingDelete),
    Submitting(PendingDelete),
}

/// The single delete call produced by a confirmed dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCategoryRequest {
    pub id: String,
    pub payload: DeleteCategoryPayload,
}

#[derive(Debug, Clone, Default)]
pub struct DeletionCascade {
    state: CascadeState,
}

impl DeletionCascade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CascadeState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, CascadeState::Idle)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, CascadeState::Submitting(_))
    }

    pub fn pending(&self) -> Option<&PendingDelete> {
        match &self.state {
            CascadeState::Idle => None,
            CascadeState::Confirming(p) | CascadeState::Submitting(p) => Some(p),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.pending().and_then(|p| p.error.as_deref())
    }

    /// Opens the dialog for `node`. Both groups start as "move" with no target.
    pub fn request_delete(&mut self, node: &CategoryNode) -> ApiResult<()> {
        if self.is_submitting() {
            return Err(ApiError::Validation(
                "A delete is already in progress".to_string(),
            ));
        }
        self.state = CascadeState::Confirming(PendingDelete {
            category: node.category.clone(),
            descendant_ids: node.descendant_ids(),
            products: Disposition::default(),
            subcategories: Disposition::default(),
            error: None,
        });
        Ok(())
    }

    fn confirming_mut(&mut self) -> ApiResult<&mut PendingDelete> {
        match &mut self.state {
            CascadeState::Confirming(p) => Ok(p),
            _ => Err(ApiError::Validation(
                "No category delete is awaiting confirmation".to_string(),
            )),
        }
    }

    pub fn set_disposition(
        &mut self,
        group: DependentGroup,
        disposition: Disposition,
    ) -> ApiResult<()> {
        let pending = self.confirming_mut()?;
        *pending.disposition_mut(group) = disposition;
        pending.error = None;
        Ok(())
    }

    pub fn choose_target(&mut self, group: DependentGroup, target: &str) -> ApiResult<()> {
        self.set_disposition(
            group,
            Disposition::Move {
                target: Some(target.to_string()),
            },
        )
    }

    /// Whether the target selector for `group` should be shown.
    pub fn needs_target(&self, group: DependentGroup) -> bool {
        match &self.state {
            CascadeState::Confirming(p) => p.disposition(group).is_move(),
            _ => false,
        }
    }

    /// Categories that may receive the dependents of `group`.
    pub fn move_candidates<'a>(
        &self,
        forest: &'a [CategoryNode],
        group: DependentGroup,
    ) -> Vec<&'a Category> {
        let Some(pending) = self.pending() else {
            return Vec::new();
        };
        let mut candidates = Vec::new();
        let mut stack: Vec<&CategoryNode> = forest.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if !pending.excludes(node.id(), group) {
                candidates.push(&node.category);
            }
            stack.extend(node.children.iter().rev());
        }
        candidates
    }

    /// Validates the choices and moves to `Submitting`.
    ///
    /// On a validation failure the dialog stays in `Confirming` with the
    /// message recorded inline.
    pub fn confirm(&mut self, forest: &[CategoryNode]) -> ApiResult<DeleteCategoryRequest> {
        let pending = match &self.state {
            CascadeState::Confirming(p) => p.clone(),
            _ => {
                return Err(ApiError::Validation(
                    "No category delete is awaiting confirmation".to_string(),
                ));
            }
        };

        for group in [DependentGroup::Products, DependentGroup::Subcategories] {
            if let Err(e) = self.check_group(&pending, forest, group) {
                if let CascadeState::Confirming(p) = &mut self.state {
                    p.error = Some(e.user_message());
                }
                return Err(e);
            }
        }

        let subcategories = if pending.has_subcategories() {
            pending.subcategories.clone()
        } else {
            // Nothing to move; keep the payload explicit for the backend.
            match pending.subcategories {
                Disposition::Move { target: None } => Disposition::DeleteAll,
                ref other => other.clone(),
            }
        };

        let request = DeleteCategoryRequest {
            id: pending.category.id.clone(),
            payload: DeleteCategoryPayload {
                products: pending.products.clone(),
                subcategories,
            },
        };

        self.state = CascadeState::Submitting(PendingDelete {
            error: None,
            ..pending
        });
        Ok(request)
    }

    fn check_group(
        &self,
        pending: &PendingDelete,
        forest: &[CategoryNode],
        group: DependentGroup,
    ) -> ApiResult<()> {
        if group == DependentGroup::Subcategories && !pending.has_subcategories() {
            return Ok(());
        }
        match pending.disposition(group) {
            Disposition::DeleteAll => Ok(()),
            Disposition::Move { target: None } => Err(ApiError::Validation(format!(
                "Choose a category to move {} to",
                group.label()
            ))),
            Disposition::Move {
                target: Some(target),
            } => {
                let valid = self
                    .move_candidates(forest, group)
                    .iter()
                    .any(|c| &c.id == target);
                if valid {
                    Ok(())
                } else {
                    Err(ApiError::Validation(format!(
                        "Cannot move {} to the selected category",
                        group.label()
                    )))
                }
            }
        }
    }

    /// The backend accepted the delete. Returns the deleted category.
    pub fn succeed(&mut self) -> Option<Category> {
        match std::mem::take(&mut self.state) {
            CascadeState::Submitting(p) => Some(p.category),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// The backend rejected the delete; reopen the dialog with the message.
    pub fn fail(&mut self, message: impl Into<String>) {
        if let CascadeState::Submitting(p) = std::mem::take(&mut self.state) {
            self.state = CascadeState::Confirming(PendingDelete {
                error: Some(message.into()),
                ..p
            });
        }
    }

    /// Closes the dialog. An in-flight submit cannot be cancelled.
    pub fn cancel(&mut self) -> bool {
        if let CascadeState::Confirming(_) = self.state {
            self.state = CascadeState::Idle;
            true
        } else {
            false
        }
    }
}
