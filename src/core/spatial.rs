//! Spatial-Index (KD-Tree) für das Picking von Kontrollpunkten.
//!
//! Abfragen laufen in der xy-Ebene; z wird ignoriert, wie bei der Auswahl
//! im Draufsicht-Editor.

use glam::{DVec2, DVec3};
use kiddo::{KdTree, SquaredEuclidean};

/// Ergebnis einer Distanzabfrage gegen den Spatial-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialMatch {
    /// Index des gefundenen Kontrollpunkts
    pub index: usize,
    /// Euklidische Distanz (xy) zum Suchpunkt
    pub distance: f64,
}

/// Read-only Spatial-Index über den Kontrollpunkten einer Strecke.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: KdTree<f64, 2>,
    positions: Vec<DVec2>,
}

impl SpatialIndex {
    /// Erstellt einen leeren Spatial-Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            positions: Vec::new(),
        }
    }

    /// Baut einen neuen Index; Item-IDs entsprechen den Punkt-Indizes.
    pub fn from_points(points: &[DVec3]) -> Self {
        let entries: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
        let tree: KdTree<f64, 2> = (&entries).into();

        Self {
            tree,
            positions: points.iter().map(|p| p.truncate()).collect(),
        }
    }

    /// Gibt die Anzahl indexierter Punkte zurück.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Gibt `true` zurück, wenn keine Punkte im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Findet den nächsten Punkt zur gegebenen Position.
    pub fn nearest(&self, query: DVec2) -> Option<SpatialMatch> {
        if self.is_empty() {
            return None;
        }

        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[query.x, query.y]);

        Some(SpatialMatch {
            index: result.item as usize,
            distance: result.distance.sqrt(),
        })
    }

    /// Findet alle Punkte innerhalb eines Radius, nach Distanz sortiert.
    pub fn within_radius(&self, query: DVec2, radius: f64) -> Vec<SpatialMatch> {
        if self.is_empty() || radius.is_sign_negative() {
            return Vec::new();
        }

        let mut results = self
            .tree
            .within::<SquaredEuclidean>(&[query.x, query.y], radius * radius)
            .into_iter()
            .map(|entry| SpatialMatch {
                index: entry.item as usize,
                distance: entry.distance.sqrt(),
            })
            .collect::<Vec<_>>();

        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results
    }

    /// Findet alle Punkte innerhalb eines achsenparallelen Rechtecks, aufsteigend sortiert.
    ///
    /// KD-Tree-Kreisabfrage um das Rechteck, danach exakte Prüfung.
    pub fn within_rect(&self, min: DVec2, max: DVec2) -> Vec<usize> {
        if self.is_empty() {
            return Vec::new();
        }

        let center = (min + max) * 0.5;
        let half = (max - min) * 0.5;
        let radius_sq = half.length_squared();

        let mut indices: Vec<usize> = self
            .tree
            .within::<SquaredEuclidean>(&[center.x, center.y], radius_sq)
            .into_iter()
            .map(|entry| entry.item as usize)
            .filter(|&i| {
                let pos = self.positions[i];
                pos.x >= min.x && pos.x <= max.x && pos.y >= min.y && pos.y <= max.y
            })
            .collect();

        indices.sort_unstable();
        indices
    }
}
