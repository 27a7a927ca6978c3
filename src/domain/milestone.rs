use super::key::EntityKind;
use super::reconcile::Reconcilable;
use crate::model::request::MilestoneRequest;
use crate::model::Milestone;

impl Reconcilable for Milestone {
    const KIND: EntityKind = EntityKind::Milestone;

    fn natural_id(&self) -> String {
        self.title.clone()
    }

    fn same_content(&self, other: &Self) -> bool {
        self.title == other.title && self.description == other.description && self.due_on == other.due_on
    }
}

/// Body for both create and edit; every field comes from the source milestone.
pub fn milestone_request(source: &Milestone) -> MilestoneRequest {
    MilestoneRequest {
        title: source.title.clone(),
        state: source.state.clone(),
        description: source.description.clone(),
        due_on: source.due_on,
    }
}
