use serde::Deserialize;

/// On-disk catalog schema (`blocks.toml`).
#[derive(Debug, Deserialize)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
}

#[derive(Debug, Deserialize)]
pub struct BlockDef {
    pub name: String,
    pub id: Option<u16>,
    pub solid: Option<bool>,
    pub mineable: Option<bool>,
    pub drop: Option<String>,
}
