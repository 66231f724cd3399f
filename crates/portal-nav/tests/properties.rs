//! Property tests for the navigation state machine and filter.

use std::collections::BTreeSet;

use portal_model::{
    CollegeId, DegreeLevel, Pattern, Resource, ResourceId, ResourceType, SubjectId, max_semester,
};
use portal_nav::{NavEvent, NavState, Scope, Section, Selection, View, visible_resources};
use proptest::prelude::*;

const SUBJECTS: [&str; 3] = ["phy", "chem", "math"];
const COLLEGES: [&str; 2] = ["dc", "sc"];

fn pattern_strategy() -> impl Strategy<Value = Pattern> {
    prop::sample::select(Pattern::ALL.to_vec())
}

fn degree_strategy() -> impl Strategy<Value = DegreeLevel> {
    prop::sample::select(DegreeLevel::ALL.to_vec())
}

fn type_strategy() -> impl Strategy<Value = ResourceType> {
    prop::sample::select(ResourceType::ALL.to_vec())
}

prop_compose! {
    fn resource_strategy()(
        n in 0u32..1000,
        subject in prop::sample::select(SUBJECTS.to_vec()),
        college in prop::sample::select(COLLEGES.to_vec()),
        semester in 1u8..=8,
        year in 2018u16..=2024,
        kind in type_strategy(),
        pattern in pattern_strategy(),
        degree in degree_strategy(),
    ) -> Resource {
        Resource {
            id: ResourceId::new(format!("r{n}")).unwrap(),
            title: format!("resource {n}"),
            college_id: CollegeId::new(college).unwrap(),
            subject_id: SubjectId::new(subject).unwrap(),
            semester,
            year,
            resource_type: kind,
            pattern,
            degree_level: degree,
            download_url: String::new(),
            size: "1 MB".to_string(),
            download_count: 0,
            created_at: None,
        }
    }
}

/// A complete, valid walk through the drill-down.
#[derive(Debug, Clone)]
struct Walk {
    subject: Scope<SubjectId>,
    pattern: Pattern,
    degree: DegreeLevel,
    college: Scope<CollegeId>,
    semester: u8,
    kind: ResourceType,
    seeded: bool,
}

impl Walk {
    fn events(&self) -> Vec<NavEvent> {
        let mut events = Vec::new();
        if self.seeded {
            events.push(NavEvent::navigate_with_type(Section::Resources, self.kind));
        }
        events.extend([
            NavEvent::SelectSubject(self.subject.clone()),
            NavEvent::SelectPattern(self.pattern),
            NavEvent::SelectDegree(self.degree),
            NavEvent::SelectCollege(self.college.clone()),
            NavEvent::SelectSemester(self.semester),
        ]);
        if !self.seeded {
            events.push(NavEvent::SelectType(self.kind));
        }
        events
    }
}

fn scope_strategy<T: Clone + std::fmt::Debug + 'static>(
    values: Vec<T>,
) -> impl Strategy<Value = Scope<T>> {
    prop_oneof![
        1 => Just(Scope::All),
        3 => prop::sample::select(values).prop_map(Scope::Only),
    ]
}

prop_compose! {
    fn walk_strategy()(
        subject in scope_strategy(SUBJECTS.iter().map(|s| SubjectId::new(*s).unwrap()).collect()),
        college in scope_strategy(COLLEGES.iter().map(|c| CollegeId::new(*c).unwrap()).collect()),
        pattern in pattern_strategy(),
        degree in degree_strategy(),
        kind in type_strategy(),
        seeded in any::<bool>(),
        semester_seed in any::<u8>(),
    ) -> Walk {
        let semester = semester_seed % max_semester(pattern, degree) + 1;
        Walk { subject, pattern, degree, college, semester, kind, seeded }
    }
}

fn run(walk: &Walk) -> NavState {
    let mut state = NavState::new();
    for event in walk.events() {
        state.apply(&event, false).expect("valid walk must be accepted");
    }
    state
}

proptest! {
    #[test]
    fn valid_walks_reach_the_list(walk in walk_strategy()) {
        let state = run(&walk);
        prop_assert_eq!(state.view, View::List);
        let selection = &state.selection;
        prop_assert!(selection.subject.is_some());
        prop_assert!(selection.pattern.is_some());
        prop_assert!(selection.degree.is_some());
        prop_assert!(selection.college.is_some());
        prop_assert!(selection.semester.is_some());
        prop_assert_eq!(selection.resource_type, Some(walk.kind));
    }

    #[test]
    fn home_crumb_always_resets(walk in walk_strategy(), steps in 0usize..8) {
        let mut state = NavState::new();
        for event in walk.events().into_iter().take(steps) {
            state.apply(&event, false).unwrap();
        }
        state.apply(&NavEvent::BreadcrumbClick(View::Subjects), false).unwrap();
        prop_assert_eq!(state, NavState::new());
    }

    #[test]
    fn filter_is_idempotent(
        resources in prop::collection::vec(resource_strategy(), 0..30),
        walk in walk_strategy(),
    ) {
        let state = run(&walk);
        let saved = BTreeSet::new();
        let first = visible_resources(&resources, state.view, &state.selection, &saved);
        let second = visible_resources(&resources, state.view, &state.selection, &saved);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn exact_match_is_included_and_one_field_off_is_not(
        base in resource_strategy(),
        dimension in 0usize..5,
    ) {
        let selection = Selection {
            subject: Some(Scope::Only(base.subject_id.clone())),
            pattern: Some(base.pattern),
            degree: Some(base.degree_level),
            college: Some(Scope::Only(base.college_id.clone())),
            semester: Some(base.semester),
            resource_type: Some(base.resource_type),
            year: Some(base.year),
        };
        let saved = BTreeSet::new();
        let hit = visible_resources(std::slice::from_ref(&base), View::List, &selection, &saved);
        prop_assert_eq!(hit.len(), 1);

        let mut off = base.clone();
        match dimension {
            0 => off.semester = base.semester % 8 + 1,
            1 => off.year = base.year + 1,
            2 => off.subject_id = SubjectId::new(format!("{}-x", base.subject_id)).unwrap(),
            3 => off.college_id = CollegeId::new(format!("{}-x", base.college_id)).unwrap(),
            _ => {
                off.resource_type = ResourceType::ALL
                    .into_iter()
                    .find(|kind| *kind != base.resource_type)
                    .unwrap();
            }
        }
        let miss = visible_resources(std::slice::from_ref(&off), View::List, &selection, &saved);
        prop_assert!(miss.is_empty());
    }

    #[test]
    fn all_college_equals_unset_college(
        resources in prop::collection::vec(resource_strategy(), 0..30),
        walk in walk_strategy(),
    ) {
        let state = run(&walk);
        let saved = BTreeSet::new();
        let mut all = state.selection.clone();
        all.college = Some(Scope::All);
        let mut unset = state.selection.clone();
        unset.college = None;
        prop_assert_eq!(
            visible_resources(&resources, View::List, &all, &saved),
            visible_resources(&resources, View::List, &unset, &saved)
        );
    }
}
