//! Map snapshots: the static view and the cumulative animation frames.

use cbsd_map_case_models::CaseRecord;
use cbsd_map_dashboard_models::{
    MagnitudeScale, MapAnimation, MapFrame, MapPoint, SliderStep, YearRange,
};

use crate::subset::Subset;

fn point(record: &CaseRecord) -> MapPoint {
    MapPoint {
        id: record.id.clone(),
        latitude: record.latitude,
        longitude: record.longitude,
        magnitude: record.magnitude,
    }
}

/// Builds one frame per year of `range`, each holding every point of
/// `subset` with `year <= cutoff`.
///
/// Points are sorted by year once and appended to a running list, so each
/// frame extends the previous one. Years without new points repeat the
/// previous point set. An inverted range yields no frames and no initial
/// snapshot.
#[must_use]
pub fn build_frames(subset: &Subset<'_>, range: YearRange) -> MapAnimation {
    if !range.is_valid() {
        return MapAnimation::default();
    }

    let mut by_year: Vec<&CaseRecord> = subset.records().to_vec();
    by_year.sort_by_key(|record| record.year);

    let mut frames = Vec::new();
    let mut steps = Vec::new();
    let mut running: Vec<MapPoint> = Vec::with_capacity(by_year.len());
    let mut pending = by_year.into_iter().peekable();

    for year in range.min..=range.max {
        while let Some(record) = pending.next_if(|record| record.year <= year) {
            running.push(point(record));
        }

        let name = MapFrame::name_for(year);
        steps.push(SliderStep {
            label: year.to_string(),
            frame: name.clone(),
        });
        frames.push(MapFrame {
            name,
            year_cutoff: year,
            points: running.clone(),
        });
    }

    log::debug!(
        "Built {} map frames with {} points for {}..={}",
        frames.len(),
        running.len(),
        range.min,
        range.max
    );

    MapAnimation {
        initial: frames.first().cloned(),
        frames,
        steps,
    }
}

/// Every point of `subset` in one frame, plus the magnitude scale used to
/// color and size the markers.
///
/// The scale is `None` when no point has a magnitude.
#[must_use]
pub fn snapshot(subset: &Subset<'_>, year_cutoff: i32) -> (MapFrame, Option<MagnitudeScale>) {
    let points: Vec<MapPoint> = subset.iter().map(point).collect();

    let scale = points
        .iter()
        .filter_map(|p| p.magnitude)
        .fold(None, |acc: Option<MagnitudeScale>, m| {
            Some(acc.map_or(MagnitudeScale { min: m, max: m }, |s| MagnitudeScale {
                min: s.min.min(m),
                max: s.max.max(m),
            }))
        });

    let frame = MapFrame {
        name: MapFrame::name_for(year_cutoff),
        year_cutoff,
        points,
    };

    (frame, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subset::filter_by;
    use crate::test_support::{case, scenario_store};
    use cbsd_map_case_models::CaseId;
    use cbsd_map_dashboard_models::ClassificationSelector;
    use cbsd_map_dataset::DatasetStore;

    fn ids(frame: &MapFrame) -> Vec<&str> {
        frame.points.iter().map(|p| p.id.as_str()).collect()
    }

    fn all_classes() -> ClassificationSelector {
        ClassificationSelector::any_of(["Infected", "Not Infected"])
    }

    #[test]
    fn frames_are_cumulative_and_contiguous() {
        let store: DatasetStore = vec![
            case("a", 2003, "Infected"),
            case("b", 2000, "Infected"),
            case("c", 2003, "Not Infected"),
            case("d", 2001, "Infected"),
        ]
        .into_iter()
        .collect();
        let range = YearRange::new(2000, 2004);
        let subset = filter_by(&store, range, &all_classes());
        let animation = build_frames(&subset, range);

        assert_eq!(
            animation.frames.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["frame2000", "frame2001", "frame2002", "frame2003", "frame2004"]
        );
        assert_eq!(ids(&animation.frames[0]), vec!["b"]);
        assert_eq!(ids(&animation.frames[1]), vec!["b", "d"]);
        assert_eq!(ids(&animation.frames[2]), vec!["b", "d"]);
        assert_eq!(ids(&animation.frames[3]), vec!["b", "d", "a", "c"]);
        assert_eq!(animation.frames[4].points, animation.frames[3].points);
        assert_eq!(animation.initial.as_ref(), animation.frames.first());
    }

    #[test]
    fn earlier_frames_are_subsets_of_later_ones() {
        let store: DatasetStore = (0..40)
            .map(|i| case(&i.to_string(), 2010 + (i * 7) % 9, "Infected"))
            .collect();
        let range = YearRange::new(2010, 2018);
        let subset = filter_by(&store, range, &all_classes());
        let animation = build_frames(&subset, range);

        for window in animation.frames.windows(2) {
            let earlier: Vec<&CaseId> = window[0].points.iter().map(|p| &p.id).collect();
            assert!(earlier.iter().all(|id| window[1].points.iter().any(|p| &&p.id == id)));
            assert!(window[0].year_cutoff + 1 == window[1].year_cutoff);
        }
        assert_eq!(animation.frames.last().unwrap().points.len(), 40);
    }

    #[test]
    fn slider_steps_address_frames() {
        let store = scenario_store();
        let range = YearRange::new(2018, 2019);
        let animation = build_frames(&filter_by(&store, range, &all_classes()), range);
        assert_eq!(
            animation.steps,
            vec![
                SliderStep {
                    label: "2018".to_owned(),
                    frame: "frame2018".to_owned()
                },
                SliderStep {
                    label: "2019".to_owned(),
                    frame: "frame2019".to_owned()
                },
            ]
        );
    }

    #[test]
    fn single_year_range_has_one_frame() {
        let store = scenario_store();
        let range = YearRange::new(2019, 2019);
        let animation = build_frames(&filter_by(&store, range, &all_classes()), range);
        assert_eq!(animation.frames.len(), 1);
        assert_eq!(ids(&animation.frames[0]), vec!["3"]);
    }

    #[test]
    fn inverted_range_has_no_frames() {
        let store = scenario_store();
        let subset = filter_by(&store, YearRange::new(2018, 2019), &all_classes());
        let animation = build_frames(&subset, YearRange::new(2019, 2018));
        assert!(animation.frames.is_empty());
        assert!(animation.steps.is_empty());
        assert!(animation.initial.is_none());
    }

    #[test]
    fn snapshot_scales_magnitudes() {
        let mut light = case("1", 2018, "Infected");
        light.magnitude = Some(1.0);
        let mut heavy = case("2", 2018, "Infected");
        heavy.magnitude = Some(4.0);
        let store: DatasetStore = vec![light, heavy, case("3", 2018, "Infected")]
            .into_iter()
            .collect();
        let range = YearRange::new(2018, 2018);
        let (frame, scale) = snapshot(&filter_by(&store, range, &all_classes()), range.max);

        assert_eq!(frame.name, "frame2018");
        assert_eq!(frame.points.len(), 3);
        assert_eq!(scale, Some(MagnitudeScale { min: 1.0, max: 4.0 }));
    }

    #[test]
    fn snapshot_without_magnitudes_has_no_scale() {
        let store = scenario_store();
        let range = YearRange::new(2018, 2019);
        let (frame, scale) = snapshot(&filter_by(&store, range, &all_classes()), range.max);
        assert_eq!(frame.points.len(), 3);
        assert!(scale.is_none());
    }
}
