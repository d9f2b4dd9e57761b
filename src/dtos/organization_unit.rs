//! OrganizationUnit DTOs - compreso il nodo dell'albero gerarchico

use crate::dtos::nullable::nullable;
use crate::dtos::validation::validate_phone_number;
use crate::entities::{OrganizationUnit, UnitType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OrganizationUnitDTO {
    pub id: i32,
    pub name: String,
    pub unit_type: UnitType,
    pub code: Option<String>,
    pub parent_unit_id: Option<i32>,
    pub province_id: Option<i32>,
    pub region_id: Option<i32>,
    pub school_id: Option<i32>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<OrganizationUnit> for OrganizationUnitDTO {
    fn from(value: OrganizationUnit) -> Self {
        Self {
            id: value.id,
            name: value.name,
            unit_type: value.unit_type,
            code: value.code,
            parent_unit_id: value.parent_unit_id,
            province_id: value.province_id,
            region_id: value.region_id,
            school_id: value.school_id,
            address: value.address,
            phone_number: value.phone_number,
            is_active: value.is_active,
            created_at: value.created_at,
        }
    }
}

/// Nodo dell'albero restituito da `/hierarchy`
#[derive(Serialize, Deserialize, Debug)]
pub struct OrganizationUnitNodeDTO {
    #[serde(flatten)]
    pub unit: OrganizationUnitDTO,
    pub children: Vec<OrganizationUnitNodeDTO>,
}

impl OrganizationUnitNodeDTO {
    /// Builds the forest of units: roots are units without a (known) parent,
    /// children keep the order of the input slice.
    pub fn build_tree(units: Vec<OrganizationUnit>) -> Vec<OrganizationUnitNodeDTO> {
        let known: std::collections::HashSet<i32> = units.iter().map(|u| u.id).collect();
        let mut by_parent: HashMap<Option<i32>, Vec<OrganizationUnitDTO>> = HashMap::new();
        for unit in units {
            let parent = unit.parent_unit_id.filter(|p| known.contains(p));
            by_parent.entry(parent).or_default().push(unit.into());
        }

        fn attach(
            parent: Option<i32>,
            by_parent: &mut HashMap<Option<i32>, Vec<OrganizationUnitDTO>>,
        ) -> Vec<OrganizationUnitNodeDTO> {
            by_parent
                .remove(&parent)
                .unwrap_or_default()
                .into_iter()
                .map(|unit| {
                    let children = attach(Some(unit.id), by_parent);
                    OrganizationUnitNodeDTO { unit, children }
                })
                .collect()
        }

        attach(None, &mut by_parent)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateOrganizationUnitDTO {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    pub unit_type: UnitType,
    #[validate(length(max = 50))]
    pub code: Option<String>,
    #[validate(range(min = 1))]
    pub parent_unit_id: Option<i32>,
    #[validate(range(min = 1))]
    pub province_id: Option<i32>,
    #[validate(range(min = 1))]
    pub region_id: Option<i32>,
    #[validate(range(min = 1))]
    pub school_id: Option<i32>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateOrganizationUnitDTO {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: Option<String>,
    pub unit_type: Option<UnitType>,
    #[validate(length(max = 50))]
    #[serde(default, deserialize_with = "nullable")]
    pub code: Option<Option<String>>,
    #[validate(range(min = 1))]
    #[serde(default, deserialize_with = "nullable")]
    pub parent_unit_id: Option<Option<i32>>,
    #[validate(range(min = 1))]
    #[serde(default, deserialize_with = "nullable")]
    pub province_id: Option<Option<i32>>,
    #[validate(range(min = 1))]
    #[serde(default, deserialize_with = "nullable")]
    pub region_id: Option<Option<i32>>,
    #[validate(range(min = 1))]
    #[serde(default, deserialize_with = "nullable")]
    pub school_id: Option<Option<i32>>,
    #[validate(length(max = 500))]
    #[serde(default, deserialize_with = "nullable")]
    pub address: Option<Option<String>>,
    #[validate(custom(function = "validate_phone_number"))]
    #[serde(default, deserialize_with = "nullable")]
    pub phone_number: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Filtri opzionali per la lista delle unità
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct OrganizationUnitQuery {
    #[serde(default)]
    pub active_only: bool,
    pub search: Option<String>,
}
