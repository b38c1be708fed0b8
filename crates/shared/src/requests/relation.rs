use serde::{Deserialize, Serialize};

/// One relation to add. Entries missing either field are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationInput {
    #[serde(default)]
    pub relation_type: Option<String>,
    #[serde(default)]
    pub target_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddRelationsRequest {
    #[serde(default)]
    pub relations: Vec<RelationInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRelationRequest {
    #[serde(default)]
    pub relation_type: Option<String>,
    #[serde(default)]
    pub target_id: Option<String>,
}
