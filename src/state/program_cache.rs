// DANS : src/state/program_cache.rs

use lazy_static::lazy_static;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

/// Famille de programme propriétaire d'un compte, utilisée pour choisir le décodeur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgramKind {
    ClassicToken,
    TokenExtensions,
    RaydiumClmm,
    Other,
}

/// Les programmes de tokens : leur classe ne dépend que de l'id.
fn classify_token_program(program_id: &Pubkey) -> Option<ProgramKind> {
    if *program_id == spl_token::id() {
        Some(ProgramKind::ClassicToken)
    } else if *program_id == spl_token_2022::id() {
        Some(ProgramKind::TokenExtensions)
    } else {
        None
    }
}

/// Classification pure : ne dépend que de l'id du programme et de la liste CLMM.
pub fn classify_program(program_id: &Pubkey, clmm_program_ids: &[Pubkey]) -> ProgramKind {
    if let Some(kind) = classify_token_program(program_id) {
        kind
    } else if clmm_program_ids.contains(program_id) {
        ProgramKind::RaydiumClmm
    } else {
        ProgramKind::Other
    }
}

/// Mémoïsation partagée entre les tâches de décodage.
///
/// Seules les classes qui ne dépendent que de l'id (programmes de tokens) sont
/// mémorisées : la liste CLMM change d'un appelant à l'autre et est relue à
/// chaque appel. Deux insertions concurrentes de la même clé écrivent donc la
/// même valeur, et la dernière écriture gagne sans conséquence.
pub struct ProgramCache {
    cache: RwLock<HashMap<Pubkey, ProgramKind>>,
}

impl Default for ProgramCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramCache {
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, program_id: &Pubkey) -> Option<ProgramKind> {
        let reader = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        reader.get(program_id).copied()
    }

    pub fn put(&self, program_id: Pubkey, kind: ProgramKind) {
        let mut writer = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        writer.insert(program_id, kind);
    }

    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Lit le cache, sinon classe le programme. Seules les classes de tokens
    /// sont mémorisées ; `RaydiumClmm` et `Other` dépendent de `clmm_program_ids`.
    pub fn classify(&self, program_id: &Pubkey, clmm_program_ids: &[Pubkey]) -> ProgramKind {
        if let Some(kind) = self.get(program_id) {
            return kind;
        }
        match classify_token_program(program_id) {
            Some(kind) => {
                self.put(*program_id, kind);
                kind
            }
            None => classify_program(program_id, clmm_program_ids),
        }
    }
}

lazy_static! {
    pub static ref PROGRAM_CACHE: ProgramCache = ProgramCache::new();
}
