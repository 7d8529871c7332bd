//! Consecutive route resolution.
//!
//! Areas linked through `consecutive_with` must be delivered back-to-back
//! by one driver. Each area carries at most one link, so a route is not a
//! first-class entity: it is reconstructed as the connected component of
//! the (undirected) link graph containing a given area.
//!
//! # Algorithm
//! `RouteGraph` indexes the areas in an arena and builds an adjacency
//! list from the links. `group_for` walks the component with an explicit
//! stack and a visited set, so cyclic links still terminate. Members are
//! then sorted by `route_order` (unset last), ties broken by area ID,
//! which makes the result independent of the entry point.
//!
//! # Cycles
//! Mutual links (`A → B`, `B → A`) collapse into one edge. A component
//! with at least as many distinct edges as members contains a cycle; such
//! groups are still returned but flagged, and the planner skips them.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.2 (graph search)

use std::collections::{BTreeSet, HashMap};

use crate::models::{AreaPriority, DeliveryArea, Week};

/// Undirected graph of consecutive-delivery links.
#[derive(Debug, Clone)]
pub struct RouteGraph<'a> {
    areas: Vec<&'a DeliveryArea>,
    index: HashMap<&'a str, usize>,
    adjacency: Vec<BTreeSet<usize>>,
}

/// Areas that must be delivered back-to-back, in route order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGroup<'a> {
    members: Vec<&'a DeliveryArea>,
    cyclic: bool,
}

impl<'a> RouteGraph<'a> {
    /// Builds the link graph.
    ///
    /// Self-links and links to unknown areas are ignored. When IDs are
    /// duplicated the first area wins.
    pub fn new(areas: &'a [DeliveryArea]) -> Self {
        let mut index = HashMap::with_capacity(areas.len());
        let mut arena = Vec::with_capacity(areas.len());
        for area in areas {
            if !index.contains_key(area.id.as_str()) {
                index.insert(area.id.as_str(), arena.len());
                arena.push(area);
            }
        }

        let mut adjacency = vec![BTreeSet::new(); arena.len()];
        for (i, area) in arena.iter().enumerate() {
            let target = area
                .consecutive_with
                .as_deref()
                .and_then(|id| index.get(id).copied());
            if let Some(j) = target.filter(|&j| j != i) {
                adjacency[i].insert(j);
                adjacency[j].insert(i);
            }
        }

        Self {
            areas: arena,
            index,
            adjacency,
        }
    }

    /// Number of distinct areas in the graph.
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Whether the graph has no areas.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Whether the area has any consecutive link, in either direction.
    pub fn is_linked(&self, area_id: &str) -> bool {
        self.index
            .get(area_id)
            .is_some_and(|&i| !self.adjacency[i].is_empty())
    }

    /// The route group containing `area_id`.
    ///
    /// Returns `None` for unknown areas. An unlinked area forms a group
    /// of one.
    pub fn group_for(&self, area_id: &str) -> Option<RouteGroup<'a>> {
        let start = *self.index.get(area_id)?;

        let mut visited = vec![false; self.areas.len()];
        let mut stack = vec![start];
        let mut component = Vec::new();
        visited[start] = true;

        while let Some(node) = stack.pop() {
            component.push(node);
            for &next in &self.adjacency[node] {
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }

        // Each undirected edge appears in both endpoint lists
        let edges: usize = component
            .iter()
            .map(|&i| self.adjacency[i].len())
            .sum::<usize>()
            / 2;
        let cyclic = component.len() > 1 && edges >= component.len();

        let mut members: Vec<&'a DeliveryArea> =
            component.into_iter().map(|i| self.areas[i]).collect();
        members.sort_by(|a, b| {
            (a.route_order.is_none(), a.route_order, a.id.as_str()).cmp(&(
                b.route_order.is_none(),
                b.route_order,
                b.id.as_str(),
            ))
        });

        Some(RouteGroup { members, cyclic })
    }

    /// Every group with two or more members, in first-seen input order.
    pub fn groups(&self) -> Vec<RouteGroup<'a>> {
        let mut seen = BTreeSet::new();
        let mut groups = Vec::new();
        for area in &self.areas {
            if seen.contains(area.id.as_str()) {
                continue;
            }
            match self.group_for(&area.id) {
                Some(group) if !group.is_standalone() => {
                    seen.extend(group.members.iter().map(|m| m.id.as_str()));
                    groups.push(group);
                }
                _ => {}
            }
        }
        groups
    }
}

impl<'a> RouteGroup<'a> {
    /// Members in route order.
    pub fn members(&self) -> &[&'a DeliveryArea] {
        &self.members
    }

    /// Member IDs in route order.
    pub fn ids(&self) -> Vec<String> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group is empty. Never true for resolver output.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether the group is a single unlinked area.
    pub fn is_standalone(&self) -> bool {
        self.members.len() == 1
    }

    /// Whether the member links contain a cycle.
    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    /// Deduplication key: sorted member IDs.
    pub fn key(&self) -> String {
        let mut ids: Vec<&str> = self.members.iter().map(|m| m.id.as_str()).collect();
        ids.sort_unstable();
        ids.join("|")
    }

    /// Sum of member delivery days.
    pub fn total_days(&self) -> u32 {
        self.members.iter().map(|m| u32::from(m.delivery_days)).sum()
    }

    /// The week every member is pinned to, if they agree.
    pub fn common_week(&self) -> Option<Week> {
        let first = self.members.first()?.week_assignment?;
        self.members
            .iter()
            .all(|m| m.week_assignment == Some(first))
            .then_some(first)
    }

    /// Highest member priority (weekly beats fortnightly).
    pub fn priority(&self) -> AreaPriority {
        self.members
            .iter()
            .map(|m| m.priority)
            .min()
            .unwrap_or_default()
    }
}

/// Resolves the route group of `area` within `all_areas`.
///
/// Returns just `area` when it is not part of `all_areas`.
///
/// # Example
/// ```
/// use delivery_rota::models::DeliveryArea;
/// use delivery_rota::routes::group_for;
///
/// let areas = vec![
///     DeliveryArea::new("B").consecutive_with("A").with_route_order(2),
///     DeliveryArea::new("A").with_route_order(1),
/// ];
/// let from_a: Vec<_> = group_for(&areas[1], &areas).iter().map(|a| a.id.as_str()).collect();
/// let from_b: Vec<_> = group_for(&areas[0], &areas).iter().map(|a| a.id.as_str()).collect();
/// assert_eq!(from_a, vec!["A", "B"]);
/// assert_eq!(from_a, from_b);
/// ```
pub fn group_for<'a>(area: &'a DeliveryArea, all_areas: &'a [DeliveryArea]) -> Vec<&'a DeliveryArea> {
    RouteGraph::new(all_areas)
        .group_for(&area.id)
        .map(|g| g.members)
        .unwrap_or_else(|| vec![area])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<'g>(group: &'g RouteGroup<'_>) -> Vec<&'g str> {
        group.members().iter().map(|m| m.id.as_str()).collect()
    }

    fn chain() -> Vec<DeliveryArea> {
        vec![
            DeliveryArea::new("C").consecutive_with("B").with_route_order(3),
            DeliveryArea::new("A").with_route_order(1),
            DeliveryArea::new("B").consecutive_with("A").with_route_order(2),
            DeliveryArea::new("X"),
        ]
    }

    #[test]
    fn test_group_order_independent_of_entry() {
        let areas = chain();
        let graph = RouteGraph::new(&areas);
        let from_a = graph.group_for("A").unwrap();
        let from_b = graph.group_for("B").unwrap();
        let from_c = graph.group_for("C").unwrap();
        assert_eq!(ids(&from_a), vec!["A", "B", "C"]);
        assert_eq!(from_a, from_b);
        assert_eq!(from_b, from_c);
        assert!(!from_a.is_cyclic());
    }

    #[test]
    fn test_standalone_area() {
        let areas = chain();
        let graph = RouteGraph::new(&areas);
        let x = graph.group_for("X").unwrap();
        assert!(x.is_standalone());
        assert!(!graph.is_linked("X"));
        assert!(graph.is_linked("A"));
        assert!(graph.group_for("missing").is_none());
    }

    #[test]
    fn test_unset_route_order_sorts_last() {
        let areas = vec![
            DeliveryArea::new("Z").consecutive_with("Y"),
            DeliveryArea::new("Y").consecutive_with("W"),
            DeliveryArea::new("W").with_route_order(2),
        ];
        let graph = RouteGraph::new(&areas);
        assert_eq!(ids(&graph.group_for("Z").unwrap()), vec!["W", "Y", "Z"]);
    }

    #[test]
    fn test_mutual_links_are_not_a_cycle() {
        let areas = vec![
            DeliveryArea::new("A").consecutive_with("B"),
            DeliveryArea::new("B").consecutive_with("A"),
        ];
        let graph = RouteGraph::new(&areas);
        let g = graph.group_for("A").unwrap();
        assert_eq!(g.len(), 2);
        assert!(!g.is_cyclic());
    }

    #[test]
    fn test_cycle_terminates_and_is_flagged() {
        let areas = vec![
            DeliveryArea::new("A").consecutive_with("B"),
            DeliveryArea::new("B").consecutive_with("C"),
            DeliveryArea::new("C").consecutive_with("A"),
        ];
        let graph = RouteGraph::new(&areas);
        let g = graph.group_for("B").unwrap();
        assert_eq!(ids(&g), vec!["A", "B", "C"]);
        assert!(g.is_cyclic());
    }

    #[test]
    fn test_ignores_self_and_dangling_links() {
        let areas = vec![
            DeliveryArea::new("A").consecutive_with("A"),
            DeliveryArea::new("B").consecutive_with("nowhere"),
        ];
        let graph = RouteGraph::new(&areas);
        assert!(graph.group_for("A").unwrap().is_standalone());
        assert!(graph.group_for("B").unwrap().is_standalone());
        assert!(graph.groups().is_empty());
    }

    #[test]
    fn test_groups_deduplicated() {
        let mut areas = chain();
        areas.push(DeliveryArea::new("Q").consecutive_with("X"));
        let graph = RouteGraph::new(&areas);
        let groups = graph.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key(), "A|B|C");
        assert_eq!(groups[1].key(), "Q|X");
    }

    #[test]
    fn test_group_totals_and_week() {
        let areas = vec![
            DeliveryArea::new("A")
                .with_delivery_days(2)
                .with_week(Week::One)
                .with_route_order(1),
            DeliveryArea::new("B")
                .consecutive_with("A")
                .with_week(Week::One)
                .with_route_order(2),
        ];
        let graph = RouteGraph::new(&areas);
        let g = graph.group_for("A").unwrap();
        assert_eq!(g.total_days(), 3);
        assert_eq!(g.common_week(), Some(Week::One));

        let mixed = vec![
            DeliveryArea::new("A").with_week(Week::One),
            DeliveryArea::new("B").consecutive_with("A").with_week(Week::Two),
        ];
        let graph = RouteGraph::new(&mixed);
        assert_eq!(graph.group_for("A").unwrap().common_week(), None);
    }

    #[test]
    fn test_free_fn_outside_list() {
        let areas = chain();
        let outsider = DeliveryArea::new("new");
        let group = group_for(&outsider, &areas);
        assert_eq!(group.len(), 1);
        assert_eq!(group[0].id, "new");
    }
}
