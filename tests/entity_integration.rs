//! Randomized spawn/delete sequences checked against a simple model of the
//! entity table.

use tuxengine::backend::SpriteHandle;
use tuxengine::components::signature::Signature;
use tuxengine::entity::{Entity, EntityInfo, EntityManager, MAX_ENTITIES};
use tuxengine::error::CoreError;

const KINDS: [Signature; 9] = [
    Signature::DIM,
    Signature::POS,
    Signature::VEL,
    Signature::ACC,
    Signature::ZPOS,
    Signature::SPRITE,
    Signature::ANIM,
    Signature::TEXT,
    Signature::INPUT,
];

fn random_signature(rng: &mut fastrand::Rng) -> Signature {
    KINDS
        .iter()
        .filter(|_| rng.bool())
        .fold(Signature::empty(), |sig, kind| sig | *kind)
}

fn random_info(rng: &mut fastrand::Rng) -> EntityInfo {
    EntityInfo {
        signature: random_signature(rng),
        x: rng.i32(-100_000..100_000),
        y: rng.i32(-100_000..100_000),
        z: rng.i32(0..3),
        w: rng.i32(0..10_000),
        h: rng.i32(0..10_000),
        sprite: SpriteHandle(rng.u32(0..8)),
    }
}

/// Slot-indexed model: `Some` while alive.
type Model = Vec<Option<(Entity, EntityInfo)>>;

fn check_against_model(mgr: &EntityManager, model: &Model, rng: &mut fastrand::Rng) {
    let alive = model.iter().flatten().count();
    assert_eq!(mgr.live_count(), alive);
    assert!(mgr.high_water_mark() >= alive);

    for (entity, info) in model.iter().flatten() {
        assert_eq!(mgr.get_info(*entity).as_ref(), Ok(info));
    }

    for _ in 0..4 {
        let mask = random_signature(rng) & random_signature(rng);
        let expected: Vec<Entity> = model
            .iter()
            .flatten()
            .filter(|(_, info)| info.signature.contains(mask))
            .map(|(entity, _)| *entity)
            .collect();
        assert_eq!(mgr.query(mask).as_slice(), expected.as_slice(), "mask {mask:?}");
    }
}

#[test]
fn random_spawn_delete_keeps_queries_consistent() {
    let mut rng = fastrand::Rng::with_seed(0x7u64);
    let mut mgr = EntityManager::new();
    let mut model: Model = Vec::new();
    let mut graveyard: Vec<Entity> = Vec::new();

    for step in 0..3000 {
        let alive: Vec<usize> = model
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| i))
            .collect();
        if alive.is_empty() || rng.u8(0..10) < 6 {
            let info = random_info(&mut rng);
            let entity = mgr.spawn(info).unwrap();
            let first_free = model.iter().position(Option::is_none).unwrap_or(model.len());
            assert_eq!(entity.index(), first_free, "step {step}");
            if first_free == model.len() {
                model.push(None);
            }
            model[first_free] = Some((entity, info));
        } else {
            let slot = alive[rng.usize(..alive.len())];
            let (entity, _) = model[slot].take().unwrap();
            mgr.delete(entity);
            graveyard.push(entity);
        }

        if step % 100 == 0 {
            check_against_model(&mgr, &model, &mut rng);
            for dead in &graveyard {
                assert!(!mgr.is_alive(*dead));
                assert_eq!(mgr.get_info(*dead), Err(CoreError::NotFound { entity: *dead }));
            }
        }
    }
    check_against_model(&mgr, &model, &mut rng);
}

#[test]
fn filling_every_slot_then_one_more_fails() {
    let mut mgr = EntityManager::new();
    let info = EntityInfo {
        signature: Signature::POS,
        ..Default::default()
    };
    for _ in 0..MAX_ENTITIES {
        mgr.spawn(info).unwrap();
    }
    assert_eq!(mgr.query(Signature::POS).len(), MAX_ENTITIES);
    assert!(matches!(mgr.spawn(info), Err(CoreError::AtCapacity { .. })));

    let victim = mgr.query(Signature::POS)[500];
    mgr.delete(victim);
    assert_eq!(mgr.spawn(info).unwrap().index(), 500);
}

#[test]
fn get_info_round_trips_spawn_fields() {
    let mut rng = fastrand::Rng::with_seed(42);
    let mut mgr = EntityManager::new();
    for _ in 0..64 {
        let info = random_info(&mut rng);
        let entity = mgr.spawn(info).unwrap();
        assert_eq!(mgr.get_info(entity), Ok(info));
    }
}
