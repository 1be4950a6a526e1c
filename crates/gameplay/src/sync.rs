// Mirror pool slots into entities: one entity per platform slot and per fire-ground strip,
// created the first frame the slot exists and updated in place afterwards. Transforms sit at
// the segment centre.

use bevy::prelude::*;
use lr_core::{HazardVisual, SegmentVisual, TrackState};
use lr_track::Segment;

/// Slot index -> mirror entity.
#[derive(Resource, Default, Debug)]
pub struct VisualSlots {
    pub platforms: Vec<Entity>,
    pub hazards: Vec<Entity>,
}

fn centre(seg: &Segment) -> Vec3 {
    let p = seg.placement;
    Vec3::new(p.lateral, p.height, p.forward + seg.length * 0.5)
}

pub fn sync_segment_visuals(
    mut commands: Commands,
    track: Option<Res<TrackState>>,
    mut slots: ResMut<VisualSlots>,
    mut platforms: Query<(&mut SegmentVisual, &mut Transform), Without<HazardVisual>>,
    mut hazards: Query<(&mut HazardVisual, &mut Transform), Without<SegmentVisual>>,
) {
    let Some(track) = track else { return };

    for (handle, seg) in track.platform_pool().iter() {
        let visual = SegmentVisual {
            slot: handle.index,
            active: seg.active,
            length: seg.length,
            width: seg.width,
        };
        let at = Transform::from_translation(centre(seg));
        match slots.platforms.get(handle.index as usize) {
            Some(&e) => {
                if let Ok((mut v, mut tf)) = platforms.get_mut(e) {
                    *v = visual;
                    *tf = at;
                }
            }
            None => {
                let e = commands.spawn((visual, at)).id();
                slots.platforms.push(e);
            }
        }
    }

    let Some(pool) = track.hazard_pool() else { return };
    for (handle, seg) in pool.iter() {
        let visual = HazardVisual {
            slot: handle.index,
            length: seg.length,
            width: seg.width,
        };
        let at = Transform::from_translation(centre(seg));
        match slots.hazards.get(handle.index as usize) {
            Some(&e) => {
                if let Ok((mut v, mut tf)) = hazards.get_mut(e) {
                    *v = visual;
                    *tf = at;
                }
            }
            None => {
                let e = commands.spawn((visual, at)).id();
                slots.hazards.push(e);
            }
        }
    }
}
