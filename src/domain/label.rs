use super::key::EntityKind;
use super::reconcile::Reconcilable;
use crate::model::request::LabelRequest;
use crate::model::Label;

impl Reconcilable for Label {
    const KIND: EntityKind = EntityKind::Label;

    fn natural_id(&self) -> String {
        self.name.clone()
    }

    fn same_content(&self, other: &Self) -> bool {
        self.color == other.color && self.description == other.description
    }
}

pub fn create_label_request(source: &Label) -> LabelRequest {
    LabelRequest {
        name: Some(source.name.clone()),
        color: source.color.clone(),
        description: source.description.clone(),
    }
}

/// The edit call addresses the label by name, so the body leaves it out.
pub fn update_label_request(source: &Label) -> LabelRequest {
    LabelRequest {
        name: None,
        color: source.color.clone(),
        description: source.description.clone(),
    }
}
