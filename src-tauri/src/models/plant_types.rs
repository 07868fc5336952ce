use serde::Serialize;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlantClass {
    pub id: u32,
    pub name: &'static str,
    pub is_healthy: bool,
}
