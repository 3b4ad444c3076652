//! Render systems.
//!
//! Sprites are drawn in two layers: entities with `zpos == 0` form the
//! background and go first, everything else is drawn over them. Positions are
//! converted from sub-pixels to screen pixels. Texts are drawn after all
//! sprites, showing only their revealed prefix.

use smallvec::SmallVec;

use crate::backend::Graphics;
use crate::components::signature::Signature;
use crate::entity::Entity;
use crate::systems::RenderSystem;
use crate::world::World;

pub struct RenderSprites;

impl RenderSystem for RenderSprites {
    fn name(&self) -> &'static str {
        "render_sprites"
    }

    fn signature(&self) -> Signature {
        Signature::SPRITE | Signature::DIM | Signature::POS | Signature::ZPOS
    }

    fn render(&self, world: &World, entities: &[Entity], gfx: &mut dyn Graphics) {
        let store = world.entities.components();
        let (background, foreground): (SmallVec<[Entity; 64]>, SmallVec<[Entity; 64]>) =
            entities.iter().copied().partition(|e| store.zpos[e.index()] == 0);

        for entity in background.iter().chain(foreground.iter()) {
            let i = entity.index();
            let pos = store.pos[i].to_pixels();
            let sprite = &store.sprite[i];
            gfx.draw_sprite(
                sprite.handle,
                pos.x,
                pos.y,
                store.zpos[i],
                sprite.offset_x,
                sprite.offset_y,
            );
        }
    }
}

pub struct RenderTexts;

impl RenderSystem for RenderTexts {
    fn name(&self) -> &'static str {
        "render_texts"
    }

    fn signature(&self) -> Signature {
        Signature::TEXT | Signature::POS
    }

    fn render(&self, world: &World, entities: &[Entity], gfx: &mut dyn Graphics) {
        let store = world.entities.components();
        for entity in entities {
            let i = entity.index();
            let pos = store.pos[i].to_pixels();
            let text = &store.text[i];
            gfx.draw_text(text.font, pos.x, pos.y, store.zpos[i], &text.content, text.visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SpriteHandle;
    use crate::backend::headless::{DrawCall, HeadlessGraphics};
    use crate::entity::{EntityInfo, TextInfo};

    fn sprite(world: &mut World, handle: u32, z: i32) -> Entity {
        world
            .entities
            .spawn(EntityInfo {
                signature: RenderSprites.signature(),
                x: 6400,
                y: 12850,
                z,
                w: 6400,
                h: 6400,
                sprite: SpriteHandle(handle),
            })
            .unwrap()
    }

    fn draw(world: &World, system: &dyn RenderSystem) -> Vec<DrawCall> {
        let mut gfx = HeadlessGraphics::new();
        gfx.begin_frame();
        let ids = world.entities.query(system.signature());
        system.render(world, &ids, &mut gfx);
        gfx.commit_frame();
        gfx.last_frame().to_vec()
    }

    #[test]
    fn background_is_drawn_before_foreground() {
        let mut world = World::headless();
        sprite(&mut world, 1, 5);
        sprite(&mut world, 2, 0);
        sprite(&mut world, 3, 2);
        sprite(&mut world, 4, 0);

        let order: Vec<u32> = draw(&world, &RenderSprites)
            .iter()
            .map(|call| match call {
                DrawCall::Sprite { sprite, .. } => sprite.0,
                DrawCall::Text { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(order, vec![2, 4, 1, 3]);
    }

    #[test]
    fn sprite_is_drawn_in_pixels_with_frame_offsets() {
        let mut world = World::headless();
        let e = sprite(&mut world, 7, 5);
        let s = &mut world.entities.components_mut().sprite[e.index()];
        s.offset_x = 2;
        s.offset_y = 3;
        assert_eq!(
            draw(&world, &RenderSprites),
            vec![DrawCall::Sprite {
                sprite: SpriteHandle(7),
                x: 64,
                y: 128,
                z: 5,
                frame_x: 2,
                frame_y: 3,
            }]
        );
    }

    #[test]
    fn text_shows_revealed_prefix() {
        let mut world = World::headless();
        let e = world
            .entities
            .spawn_text(TextInfo {
                font: SpriteHandle(9),
                x: 40000,
                y: 85000,
                z: 5,
                content: "Take this!".into(),
                animate: true,
            })
            .unwrap();
        world.entities.components_mut().text[e.index()].visible = 4;
        assert_eq!(
            draw(&world, &RenderTexts),
            vec![DrawCall::Text {
                font: SpriteHandle(9),
                x: 400,
                y: 850,
                z: 5,
                text: "Take".into(),
            }]
        );
        // text entities have no dimensions and never reach the sprite pass
        assert!(draw(&world, &RenderSprites).is_empty());
    }
}
