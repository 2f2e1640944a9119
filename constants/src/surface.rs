/// Name fragments that mark a mesh as floor, ceiling or furniture.
/// Matched case-insensitively as substrings of the node label.
pub const EXCLUDED_TERMS: &[&str] = &[
    "floor", "ground", "ceiling", "roof", "sofa", "couch", "plant", "lamp", "shelf", "cushion",
    "frame",
];

/// Name fragments that mark a mesh as wall or structure.
pub const INCLUDED_TERMS: &[&str] = &["wall", "structure"];

/// A node whose world Y sits within this distance of the room's lowest point is floor.
pub const FLOOR_EPSILON: f32 = 0.05;

/// Vertical scale above which an unnamed node is treated as a structural wall.
pub const WALL_SCALE_THRESHOLD: f32 = 1.5;

pub struct SurfaceRoleInfo {
    pub id: u8,
    pub name: &'static str,
}

pub const SURFACE_ROLE_MAP: &[SurfaceRoleInfo] = &[
    SurfaceRoleInfo {
        id: 0,
        name: "paintable",
    },
    SurfaceRoleInfo {
        id: 1,
        name: "excluded",
    },
];

pub fn get_role_name(id: u8) -> String {
    SURFACE_ROLE_MAP
        .iter()
        .find(|r| r.id == id)
        .map_or("unknown", |r| r.name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabularies_are_lowercase_and_disjoint() {
        for term in EXCLUDED_TERMS.iter().chain(INCLUDED_TERMS) {
            assert_eq!(*term, term.to_lowercase());
        }
        for term in INCLUDED_TERMS {
            assert!(!EXCLUDED_TERMS.contains(term));
        }
    }

    #[test]
    fn role_names_resolve() {
        assert_eq!(get_role_name(0), "paintable");
        assert_eq!(get_role_name(1), "excluded");
        assert_eq!(get_role_name(9), "unknown");
    }
}
