use bevy::prelude::*;

use crate::engine::assets::room_manifest::PaintFinish;
use crate::engine::colour::PaintColour;
use crate::engine::scene::surface_classifier::PaintableSurfaces;

/// The colour currently painted on the walls. Last write wins.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ActivePaint {
    pub colour: Option<PaintColour>,
    /// A colour has come from the live feed. Colours set over RPC leave it alone.
    pub sampled: bool,
}

/// Paint material for one wall node, derived from the node's original material.
///
/// Baked texture maps are dropped so the flat paint colour dominates and the
/// finish values are not modulated by a metallic-roughness map.
pub fn paint_material(original: Option<&StandardMaterial>, finish: &PaintFinish) -> StandardMaterial {
    let mut material = original.cloned().unwrap_or_default();
    material.base_color_texture = None;
    material.metallic_roughness_texture = None;
    material.perceptual_roughness = finish.roughness;
    material.metallic = finish.metalness;
    material
}

/// Write `colour` into every paintable material, converted to linear light.
///
/// Materials already holding the colour are left untouched, so repeating a
/// colour does not mark any asset as changed. Returns the number written.
pub fn apply_colour(
    materials: &mut Assets<StandardMaterial>,
    surfaces: &PaintableSurfaces,
    colour: PaintColour,
) -> usize {
    let target = Color::LinearRgba(colour.to_linear());
    let mut written = 0;

    for surface in &surfaces.paintable {
        let current = materials.get(&surface.material).map(|m| m.base_color);
        if current.is_none() || current == Some(target) {
            continue;
        }
        if let Some(material) = materials.get_mut(&surface.material) {
            material.base_color = target;
            written += 1;
        }
    }

    written
}

/// Push the active paint into the wall materials when either side changes.
pub fn apply_paint_colour(
    paint: Res<ActivePaint>,
    surfaces: Option<Res<PaintableSurfaces>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(surfaces) = surfaces else {
        return;
    };
    if !paint.is_changed() && !surfaces.is_changed() {
        return;
    }
    let Some(colour) = paint.colour else {
        return;
    };

    let written = apply_colour(&mut materials, &surfaces, colour);
    if written > 0 {
        debug!("Painted {written} surfaces {colour}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::surface_classifier::classify_room_surfaces;
    use crate::engine::scene::test_room::{TestRoom, spawn_test_room};
    use bevy::ecs::system::RunSystemOnce;
    use bevy::color::ColorToPacked;

    fn classified_room() -> (World, TestRoom) {
        let mut world = World::new();
        let room = spawn_test_room(&mut world);
        world.run_system_once(classify_room_surfaces).unwrap();
        (world, room)
    }

    fn base_colours(world: &World) -> Vec<Color> {
        let materials = world.resource::<Assets<StandardMaterial>>();
        let mut colours: Vec<(String, Color)> = materials
            .iter()
            .map(|(id, m)| (format!("{id:?}"), m.base_color))
            .collect();
        colours.sort_by(|a, b| a.0.cmp(&b.0));
        colours.into_iter().map(|(_, c)| c).collect()
    }

    #[test]
    fn paint_material_strips_maps_and_sets_finish() {
        let original = StandardMaterial {
            base_color_texture: Some(Handle::default()),
            metallic_roughness_texture: Some(Handle::default()),
            perceptual_roughness: 0.1,
            metallic: 1.0,
            ..default()
        };
        let finish = PaintFinish {
            roughness: 0.7,
            metalness: 0.01,
        };
        let material = paint_material(Some(&original), &finish);
        assert!(material.base_color_texture.is_none());
        assert!(material.metallic_roughness_texture.is_none());
        assert_eq!(material.perceptual_roughness, 0.7);
        assert_eq!(material.metallic, 0.01);

        let fresh = paint_material(None, &PaintFinish::default());
        assert_eq!(fresh.perceptual_roughness, 0.65);
        assert_eq!(fresh.metallic, 0.0);
    }

    #[test]
    fn classified_wall_material_uses_paint_finish() {
        let (world, _) = classified_room();
        let surfaces = world.resource::<PaintableSurfaces>();
        let materials = world.resource::<Assets<StandardMaterial>>();
        let wall = materials.get(&surfaces.paintable[0].material).unwrap();
        assert!(wall.base_color_texture.is_none());
        assert_eq!(wall.perceptual_roughness, 0.65);
        assert_eq!(wall.metallic, 0.0);
    }

    #[test]
    fn colour_reaches_only_the_walls() {
        let (mut world, room) = classified_room();
        let shared_before = world
            .resource::<Assets<StandardMaterial>>()
            .get(&room.shared_material)
            .unwrap()
            .base_color;

        world.insert_resource(ActivePaint {
            colour: Some("#336699".parse().unwrap()),
            ..default()
        });
        world.run_system_once(apply_paint_colour).unwrap();

        let surfaces = world.resource::<PaintableSurfaces>().clone();
        let materials = world.resource::<Assets<StandardMaterial>>();

        let wall = materials.get(&surfaces.paintable[0].material).unwrap();
        let Color::LinearRgba(linear) = wall.base_color else {
            panic!("wall colour should be stored as linear");
        };
        assert_eq!(Srgba::from(linear).to_u8_array(), [0x33, 0x66, 0x99, 0xff]);

        for excluded in &surfaces.excluded {
            assert_eq!(excluded.material.as_ref(), Some(&room.shared_material));
            let material = world
                .get::<MeshMaterial3d<StandardMaterial>>(excluded.entity)
                .unwrap();
            assert_eq!(material.0, room.shared_material);
        }
        let shared_after = materials.get(&room.shared_material).unwrap().base_color;
        assert_eq!(shared_before, shared_after);
    }

    #[test]
    fn applying_the_same_colour_twice_is_idempotent() {
        let (mut world, _) = classified_room();
        let surfaces = world.resource::<PaintableSurfaces>().clone();
        let colour = PaintColour::new(0x33, 0x66, 0x99);

        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        assert_eq!(apply_colour(&mut materials, &surfaces, colour), 1);
        drop(materials);
        let once = base_colours(&world);

        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        assert_eq!(apply_colour(&mut materials, &surfaces, colour), 0);
        drop(materials);
        assert_eq!(base_colours(&world), once);
    }

    #[test]
    fn later_colours_supersede_earlier_ones() {
        let (mut world, _) = classified_room();
        world.init_resource::<ActivePaint>();
        for hex in ["#ff0000", "#00ff00", "#123456"] {
            world.resource_mut::<ActivePaint>().colour = Some(hex.parse().unwrap());
            world.run_system_once(apply_paint_colour).unwrap();
        }

        let surfaces = world.resource::<PaintableSurfaces>();
        let wall = world
            .resource::<Assets<StandardMaterial>>()
            .get(&surfaces.paintable[0].material)
            .unwrap();
        let expected = PaintColour::new(0x12, 0x34, 0x56).to_linear();
        assert_eq!(wall.base_color, Color::LinearRgba(expected));
    }

    #[test]
    fn nothing_is_painted_before_classification() {
        let mut world = World::new();
        world.init_resource::<Assets<StandardMaterial>>();
        world.insert_resource(ActivePaint {
            colour: Some(PaintColour::new(1, 2, 3)),
            ..default()
        });
        world.run_system_once(apply_paint_colour).unwrap();
        assert_eq!(world.resource::<Assets<StandardMaterial>>().len(), 0);
    }
}
