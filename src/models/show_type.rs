use serde::{Deserialize, Serialize};

use super::blank_as_none;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowType {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
}

impl ShowType {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
        }
    }

    pub fn color(&self) -> &'static str {
        type_color(self.id)
    }
}

/// Badge colour for a show type id. Unknown ids share a neutral brown.
pub fn type_color(type_id: i64) -> &'static str {
    match type_id {
        1 => "#4A6FA5", // 主持
        2 => "#6B8E23", // 单口
        3 => "#B85C38", // 比赛
        4 => "#4B0082", // 商务演出
        5 => "#708090", // 其他
        6 => "#C71585", // 即兴
        _ => "#8C7851",
    }
}

/// Looks up a type name, falling back to `类型 <id>` for ids missing from the table.
pub fn type_name(types: &[ShowType], type_id: i64) -> String {
    types
        .iter()
        .find(|t| t.id == type_id)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| format!("类型 {type_id}"))
}
