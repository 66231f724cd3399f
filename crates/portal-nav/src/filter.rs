//! Resource filtering for the current view.
//!
//! `visible_resources` is the pure predicate. `FilterCache` memoizes it on
//! the (view, selection, saved set, catalog revision) tuple so repeated
//! renders of an unchanged screen do not rescan the catalog.

use std::collections::BTreeSet;

use portal_model::{College, CollegeId, Resource, ResourceId, Subject, SubjectId};

use crate::selection::Selection;
use crate::view::View;

// ============================================================================
// Predicate
// ============================================================================

/// Resources to show for `view` given the current selections.
///
/// - `profile`: resources whose id is in `saved`, in catalog order.
/// - `list` with a complete selection: resources matching every choice.
/// - anything else: nothing.
pub fn visible_resources<'a>(
    resources: &'a [Resource],
    view: View,
    selection: &Selection,
    saved: &BTreeSet<ResourceId>,
) -> Vec<&'a Resource> {
    visible_indices(resources, view, selection, saved)
        .into_iter()
        .map(|index| &resources[index])
        .collect()
}

fn visible_indices(
    resources: &[Resource],
    view: View,
    selection: &Selection,
    saved: &BTreeSet<ResourceId>,
) -> Vec<usize> {
    let positions = resources.iter().enumerate();
    match view {
        View::Profile => positions
            .filter(|(_, resource)| saved.contains(&resource.id))
            .map(|(index, _)| index)
            .collect(),
        View::List if selection.is_list_complete() => positions
            .filter(|(_, resource)| matches_selection(resource, selection))
            .map(|(index, _)| index)
            .collect(),
        _ => Vec::new(),
    }
}

/// Does `resource` satisfy every active selection?
///
/// Unset dimensions do not filter. Subject and college also accept the
/// "all" scope.
pub fn matches_selection(resource: &Resource, selection: &Selection) -> bool {
    selection
        .subject
        .as_ref()
        .is_none_or(|scope| scope.matches(&resource.subject_id))
        && selection
            .pattern
            .is_none_or(|pattern| pattern == resource.pattern)
        && selection
            .degree
            .is_none_or(|degree| degree == resource.degree_level)
        && selection
            .college
            .as_ref()
            .is_none_or(|scope| scope.matches(&resource.college_id))
        && selection
            .semester
            .is_none_or(|semester| semester == resource.semester)
        && selection
            .resource_type
            .is_none_or(|kind| kind == resource.resource_type)
        && selection.year.is_none_or(|year| year == resource.year)
}

/// Distinct years available for the current list selection, newest first.
///
/// Ignores any year already chosen so the options do not collapse to one.
pub fn available_years(resources: &[Resource], selection: &Selection) -> Vec<u16> {
    if !selection.is_list_complete() {
        return Vec::new();
    }
    let without_year = Selection {
        year: None,
        ..selection.clone()
    };
    let years: BTreeSet<u16> = resources
        .iter()
        .filter(|resource| matches_selection(resource, &without_year))
        .map(|resource| resource.year)
        .collect();
    years.into_iter().rev().collect()
}

// ============================================================================
// Catalog
// ============================================================================

/// In-memory resource collection with its reference data.
///
/// Every mutation bumps `revision`, which is what `FilterCache` keys on.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    resources: Vec<Resource>,
    subjects: Vec<Subject>,
    colleges: Vec<College>,
    revision: u64,
}

impl Catalog {
    pub fn new(resources: Vec<Resource>, subjects: Vec<Subject>, colleges: Vec<College>) -> Self {
        Self {
            resources,
            subjects,
            colleges,
            revision: 0,
        }
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn colleges(&self) -> &[College] {
        &self.colleges
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn resource(&self, id: &ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|resource| &resource.id == id)
    }

    pub fn subject(&self, id: &SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|subject| &subject.id == id)
    }

    pub fn college(&self, id: &CollegeId) -> Option<&College> {
        self.colleges.iter().find(|college| &college.id == id)
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
        self.revision += 1;
    }

    /// Remove a resource, returning it if it existed.
    pub fn remove_resource(&mut self, id: &ResourceId) -> Option<Resource> {
        let index = self.resources.iter().position(|resource| &resource.id == id)?;
        self.revision += 1;
        Some(self.resources.remove(index))
    }

    /// Mutate one resource in place.
    pub fn update_resource<R>(
        &mut self,
        id: &ResourceId,
        update: impl FnOnce(&mut Resource) -> R,
    ) -> Option<R> {
        let resource = self.resources.iter_mut().find(|resource| &resource.id == id)?;
        let result = update(resource);
        self.revision += 1;
        Some(result)
    }

    /// Replace the whole resource list (e.g. after reloading from the store).
    pub fn replace_resources(&mut self, resources: Vec<Resource>) {
        self.resources = resources;
        self.revision += 1;
    }
}

// ============================================================================
// Memoized filter
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct FilterKey {
    view: View,
    selection: Selection,
    saved: BTreeSet<ResourceId>,
    revision: u64,
}

/// Memoized `visible_resources` over a `Catalog`.
///
/// Holds indices into the catalog, so it is only valid for the catalog
/// revision it was computed against; any change to the key recomputes.
#[derive(Debug, Clone, Default)]
pub struct FilterCache {
    key: Option<FilterKey>,
    indices: Vec<usize>,
    recomputations: u64,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible<'a>(
        &mut self,
        catalog: &'a Catalog,
        view: View,
        selection: &Selection,
        saved: &BTreeSet<ResourceId>,
    ) -> Vec<&'a Resource> {
        let key = FilterKey {
            view,
            selection: selection.clone(),
            saved: saved.clone(),
            revision: catalog.revision(),
        };
        if self.key.as_ref() != Some(&key) {
            self.indices = visible_indices(catalog.resources(), view, selection, saved);
            self.key = Some(key);
            self.recomputations += 1;
        }
        self.indices
            .iter()
            .filter_map(|&index| catalog.resources().get(index))
            .collect()
    }

    /// Drop the memoized result.
    pub fn invalidate(&mut self) {
        self.key = None;
        self.indices.clear();
    }

    /// How many times the predicate actually ran.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
