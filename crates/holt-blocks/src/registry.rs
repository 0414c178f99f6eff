use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::BlocksConfig;
use super::types::BlockId;

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub solid: bool,
    pub mineable: bool,
    /// What breaking this block yields. Defaults to the block itself.
    pub drop: BlockId,
}

impl BlockType {
    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            solid: false,
            mineable: false,
            drop: id,
        }
    }
}

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: BlockId) -> Option<&str> {
        self.get(id).map(|t| t.name.as_str())
    }

    #[inline]
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).map(|t| t.solid).unwrap_or(false)
    }

    #[inline]
    pub fn is_mineable(&self, id: BlockId) -> bool {
        self.get(id).map(|t| t.mineable).unwrap_or(false)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry::new();
        // First pass: assign ids and register names. Drop references may point
        // at blocks defined later, so they resolve in a second pass.
        let mut drops: Vec<(BlockId, Option<String>)> = Vec::with_capacity(cfg.blocks.len());
        for def in cfg.blocks.into_iter() {
            let id = def.id.unwrap_or(reg.blocks.len() as u16);
            let solid = def.solid.unwrap_or(true);
            let mineable = def.mineable.unwrap_or(true);
            let ty = BlockType {
                id,
                name: def.name,
                solid,
                mineable,
                drop: id,
            };
            if reg.blocks.len() <= id as usize {
                reg.blocks
                    .resize(id as usize + 1, BlockType::placeholder(id));
            }
            reg.blocks[id as usize] = ty;
            drops.push((id, def.drop));
        }
        reg.by_name = reg
            .blocks
            .iter()
            .filter(|t| !t.name.is_empty())
            .map(|t| (t.name.clone(), t.id))
            .collect();
        for (id, drop_name) in drops {
            let drop = drop_name
                .as_deref()
                .and_then(|n| reg.id_by_name(n))
                .unwrap_or(id);
            if let Some(ty) = reg.blocks.get_mut(id as usize) {
                ty.drop = drop;
            }
        }
        Ok(reg)
    }
}
