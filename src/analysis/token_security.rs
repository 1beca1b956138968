// src/analysis/token_security.rs

use serde::Serialize;

use crate::decoders::MintAccount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskFactor {
    /// Le mint peut encore émettre des tokens.
    MintAuthorityPresent,
    /// Les comptes de tokens peuvent être gelés.
    FreezeAuthorityPresent,
    HighHolderConcentration,
    ModerateHolderConcentration,
    TransferFee,
    TransferHook,
    PermanentDelegate,
}

impl RiskFactor {
    pub fn penalty(&self) -> u8 {
        match self {
            RiskFactor::MintAuthorityPresent => 30,
            RiskFactor::FreezeAuthorityPresent => 20,
            RiskFactor::HighHolderConcentration => 25,
            RiskFactor::ModerateHolderConcentration => 15,
            RiskFactor::TransferFee => 10,
            RiskFactor::TransferHook => 15,
            RiskFactor::PermanentDelegate => 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PositiveFactor {
    MintAuthorityRevoked,
    FreezeAuthorityRevoked,
    DistributedHolders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    MediumLow,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => RiskLevel::Low,
            60..=79 => RiskLevel::MediumLow,
            40..=59 => RiskLevel::Medium,
            20..=39 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityReport {
    /// De 0 à 100, 100 étant le plus sûr.
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<RiskFactor>,
    pub positive_factors: Vec<PositiveFactor>,
}

/// Note un mint à partir de ses autorités et de ses extensions.
///
/// `holder_concentration` est la part (en %) détenue par les plus gros porteurs,
/// quand un collaborateur l'a calculée ; sinon ce critère est ignoré.
pub fn assess_mint(mint: &MintAccount, holder_concentration: Option<f64>) -> SecurityReport {
    let mut risk_factors = Vec::new();
    let mut positive_factors = Vec::new();

    if mint.mint_authority.is_some() {
        risk_factors.push(RiskFactor::MintAuthorityPresent);
    } else {
        positive_factors.push(PositiveFactor::MintAuthorityRevoked);
    }

    if mint.freeze_authority.is_some() {
        risk_factors.push(RiskFactor::FreezeAuthorityPresent);
    } else {
        positive_factors.push(PositiveFactor::FreezeAuthorityRevoked);
    }

    match holder_concentration {
        Some(c) if c > 70.0 => risk_factors.push(RiskFactor::HighHolderConcentration),
        Some(c) if c > 50.0 => risk_factors.push(RiskFactor::ModerateHolderConcentration),
        Some(_) => positive_factors.push(PositiveFactor::DistributedHolders),
        None => {}
    }

    if mint.is_token_extensions {
        if mint.transfer_fee().is_some() {
            risk_factors.push(RiskFactor::TransferFee);
        }
        if mint.has_transfer_hook() {
            risk_factors.push(RiskFactor::TransferHook);
        }
        if mint.has_permanent_delegate() {
            risk_factors.push(RiskFactor::PermanentDelegate);
        }
    }

    let penalty: u32 = risk_factors.iter().map(|f| f.penalty() as u32).sum();
    let risk_score = 100u32.saturating_sub(penalty) as u8;

    SecurityReport {
        risk_score,
        risk_level: RiskLevel::from_score(risk_score),
        risk_factors,
        positive_factors,
    }
}
