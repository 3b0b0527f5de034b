// ==========================================
// 设备可靠性分析系统 - 维护成本模型
// ==========================================
// 职责: 预防性 / 事后维修的单次成本构成
// ==========================================

use serde::{Deserialize, Serialize};

/// 单次维护动作成本构成
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostComponents {
    pub material: f64,        // 备件/材料
    pub labor: f64,           // 人工
    pub production_loss: f64, // 停产损失
}

impl CostComponents {
    pub fn new(material: f64, labor: f64, production_loss: f64) -> Self {
        Self {
            material,
            labor,
            production_loss,
        }
    }

    pub fn total(&self) -> f64 {
        self.material + self.labor + self.production_loss
    }

    /// 返回第一个负数或非有限的分项名称
    pub fn first_invalid_component(&self) -> Option<(&'static str, f64)> {
        [
            ("material", self.material),
            ("labor", self.labor),
            ("production_loss", self.production_loss),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite() || *v < 0.0)
    }
}

/// 成本模型: Cp = 预防性动作总成本, Cc = 事后维修总成本
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostModel {
    pub preventive: CostComponents,
    pub corrective: CostComponents,
}

impl CostModel {
    pub fn new(preventive: CostComponents, corrective: CostComponents) -> Self {
        Self {
            preventive,
            corrective,
        }
    }

    /// Cp
    pub fn preventive_cost(&self) -> f64 {
        self.preventive.total()
    }

    /// Cc
    pub fn corrective_cost(&self) -> f64 {
        self.corrective.total()
    }
}
