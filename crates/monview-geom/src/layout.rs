use crate::error::{Fault, GeometryError};
use crate::monitor::{MonitorId, MonitorSpec};
use crate::point::Point;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::collections::VecDeque;
use std::f64::consts::FRAC_PI_2;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// How the monitors of a setup are placed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Arrangement {
    /// Every monitor keeps its own distance, rotation and offset.
    #[default]
    Free,
    /// Edge to edge, each monitor facing the viewer square-on.
    Perpendicular,
    /// Edge to edge, each monitor continuing from its neighbour.
    Smooth,
}

/// One arrangement of monitors, ordered from the viewer's left.
#[derive(Debug, Clone, PartialEq)]
pub struct Setup {
    pub arrangement: Arrangement,
    /// Distance to the middle of the chain. Only used by the chained
    /// arrangements.
    pub viewing_distance: f64,
    pub monitors: Vec<MonitorSpec>,
}

impl Setup {
    pub fn new(
        arrangement: Arrangement,
        viewing_distance: f64,
        monitors: Vec<MonitorSpec>,
    ) -> Self {
        Self {
            arrangement,
            viewing_distance,
            monitors,
        }
    }

    pub fn placed(&self) -> Result<Vec<MonitorSpec>, GeometryError> {
        arrange(&self.monitors, self.viewing_distance, self.arrangement)
    }
}

struct Link {
    id: Option<MonitorId>,
    spec: MonitorSpec,
    left: Point,
    right: Point,
}

impl Link {
    fn midpoint(&self) -> Point {
        (self.left + self.right) / 2.0
    }
}

/// Monitors joined edge to edge, grown outwards from the middle.
struct Chain {
    arrangement: Arrangement,
    links: VecDeque<Link>,
}

impl Chain {
    /// Starts the chain with a monitor straight ahead. With `straddle` the
    /// monitor is swung right so that its left edge sits on the forward axis.
    fn centred(
        arrangement: Arrangement,
        id: Option<MonitorId>,
        spec: MonitorSpec,
        viewing_distance: f64,
        straddle: bool,
    ) -> Self {
        let half = spec.chord_width() / 2.0;
        let y = viewing_distance - spec.depth();
        let (mut left, mut right) = (Point::new(-half, y), Point::new(half, y));
        if straddle {
            let turn = -(half / viewing_distance).atan();
            left = left.rotate(turn);
            right = right.rotate(turn);
        }

        Self {
            arrangement,
            links: VecDeque::from([Link {
                id,
                spec,
                left,
                right,
            }]),
        }
    }

    fn attach_left(&mut self, id: MonitorId, spec: MonitorSpec) -> Result<(), GeometryError> {
        let neighbour = &self.links[0];
        let right = neighbour.left;
        let chord = spec.chord_width();

        let left = match self.arrangement {
            Arrangement::Smooth => {
                let phase = neighbour.midpoint().phase() + neighbour.spec.arc_angle(0.0)
                    - spec.arc_angle(1.0);
                right + Point::from_polar(chord, phase + FRAC_PI_2)
            }
            _ => swing(right, chord, 1.0)
                .ok_or_else(|| GeometryError::invalid(id, Fault::Unreachable))?,
        };

        self.links.push_front(Link {
            id: Some(id),
            spec,
            left,
            right,
        });
        Ok(())
    }

    fn attach_right(&mut self, id: MonitorId, spec: MonitorSpec) -> Result<(), GeometryError> {
        let neighbour = &self.links[self.links.len() - 1];
        let left = neighbour.right;
        let chord = spec.chord_width();

        let right = match self.arrangement {
            Arrangement::Smooth => {
                let phase = neighbour.midpoint().phase() + neighbour.spec.arc_angle(1.0)
                    - spec.arc_angle(0.0);
                left + Point::from_polar(chord, phase - FRAC_PI_2)
            }
            _ => swing(left, chord, -1.0)
                .ok_or_else(|| GeometryError::invalid(id, Fault::Unreachable))?,
        };

        self.links.push_back(Link {
            id: Some(id),
            spec,
            left,
            right,
        });
        Ok(())
    }

    fn into_specs(self) -> Result<Vec<MonitorSpec>, GeometryError> {
        self.links
            .into_iter()
            .filter_map(|link| link.id.map(|id| (id, link)))
            .map(|(id, link)| from_chord(id, &link.spec, link.left, link.right))
            .collect()
    }
}

/// Swings a chord around the viewer from a fixed end so that both of its
/// ends stay equally far away. `direction` is +1 for counter-clockwise.
fn swing(end: Point, chord: f64, direction: f64) -> Option<Point> {
    let (radius, phase) = end.to_polar();
    let half = chord / 2.0;
    (half <= radius)
        .then(|| Point::from_polar(radius, phase + direction * 2.0 * (half / radius).asin()))
}

/// Expresses a chord given by its two ends as distance, rotation and offset.
fn from_chord(
    id: MonitorId,
    spec: &MonitorSpec,
    left: Point,
    right: Point,
) -> Result<MonitorSpec, GeometryError> {
    let mid = (left + right) / 2.0;
    let chord = right - left;
    let rotation = if chord.length() > f64::EPSILON {
        (-chord.y).atan2(chord.x)
    } else {
        // zero-width monitor: face the viewer
        mid.x.atan2(mid.y)
    };
    let normal = Point::new(rotation.sin(), rotation.cos());
    let along = Point::new(rotation.cos(), -rotation.sin());

    let distance = mid.dot(normal);
    if !(distance > 0.0) {
        return Err(GeometryError::invalid(id, Fault::BehindViewer));
    }

    Ok(MonitorSpec {
        distance,
        rotation: rotation.to_degrees(),
        offset: mid.dot(along),
        ..*spec
    })
}

/// Places `monitors` according to `arrangement`. Chained arrangements take
/// width, height and curvature from each monitor and ignore its own
/// distance, rotation and offset.
pub fn arrange(
    monitors: &[MonitorSpec],
    viewing_distance: f64,
    arrangement: Arrangement,
) -> Result<Vec<MonitorSpec>, GeometryError> {
    if arrangement == Arrangement::Free {
        return Ok(monitors.to_vec());
    }
    if !(viewing_distance.is_finite() && viewing_distance > 0.0) {
        return Err(GeometryError::InvalidViewingDistance(viewing_distance));
    }
    for (i, spec) in monitors.iter().enumerate() {
        MonitorSpec {
            distance: viewing_distance,
            rotation: 0.0,
            offset: 0.0,
            ..*spec
        }
        .validate(MonitorId::new(i))?;
    }
    if monitors.is_empty() {
        return Ok(Vec::new());
    }

    let mid = monitors.len() / 2;
    let even = monitors.len() % 2 == 0;
    let (mut chain, right_start) = match (even, arrangement) {
        (true, Arrangement::Smooth) => {
            let anchor = MonitorSpec::new(0.0, viewing_distance);
            let chain = Chain::centred(arrangement, None, anchor, viewing_distance, false);
            (chain, mid)
        }
        _ => {
            let id = MonitorId::new(mid);
            let chain =
                Chain::centred(arrangement, Some(id), monitors[mid], viewing_distance, even);
            (chain, mid + 1)
        }
    };

    for (i, spec) in monitors.iter().enumerate().take(mid).rev() {
        chain.attach_left(MonitorId::new(i), *spec)?;
    }
    for (i, spec) in monitors.iter().enumerate().skip(right_start) {
        chain.attach_right(MonitorId::new(i), *spec)?;
    }

    log::trace!(
        "arranged {} monitors ({arrangement}) at {viewing_distance} cm",
        monitors.len()
    );
    chain.into_specs()
}
