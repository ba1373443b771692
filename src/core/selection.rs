//! Selektionsmaske über die Kontrollpunkte einer geschlossenen Strecke.
//!
//! Die Maske hat `n + 1` Einträge; der letzte spiegelt immer Eintrag 0,
//! damit Nachbarschaftstests (`flag[i] && flag[i + 1]`) ohne Modulo über
//! die Nahtstelle laufen. Renderer bekommen die Flags inklusive Spiegel.

use std::ops::Range;

/// Auswahl von Kontrollpunkten für `select`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Keine Punkte (mit `multi = false` also: Selektion leeren)
    None,
    /// Alle Punkte
    All,
    /// Explizite Indizes; Duplikate zählen einfach
    Indices(Vec<usize>),
    /// Zusammenhängender Bereich
    Range(Range<usize>),
}

impl Selector {
    /// Löst den Selektor gegen `len` Punkte auf: sortiert, ohne Duplikate.
    ///
    /// Gibt den ersten Index außerhalb des Bereichs als `Err` zurück.
    pub fn resolve(&self, len: usize) -> Result<Vec<usize>, usize> {
        let mut indices: Vec<usize> = match self {
            Self::None => Vec::new(),
            Self::All => (0..len).collect(),
            Self::Indices(list) => list.clone(),
            Self::Range(range) => range.clone().collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        match indices.iter().find(|&&i| i >= len) {
            Some(&bad) => Err(bad),
            None => Ok(indices),
        }
    }
}

/// Selektionsflags mit Spiegel-Eintrag am Ende.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionMask {
    flags: Vec<bool>,
}

impl SelectionMask {
    /// Leere Selektion für `len` Punkte.
    pub fn new(len: usize) -> Self {
        Self {
            flags: vec![false; len + 1],
        }
    }

    /// Anzahl der Punkte (ohne Spiegel).
    pub fn len(&self) -> usize {
        self.flags.len() - 1
    }

    /// `true` wenn die Maske keine Punkte abdeckt.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn mirror(&mut self) {
        let first = self.flags.first().copied().unwrap_or(false);
        if let Some(last) = self.flags.last_mut() {
            *last = first;
        }
    }

    /// Alle Flags inklusive Spiegel-Eintrag.
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    /// Prüft ob Punkt `index` selektiert ist.
    pub fn is_selected(&self, index: usize) -> bool {
        index < self.len() && self.flags[index]
    }

    /// Hebt die gesamte Selektion auf.
    pub fn clear(&mut self) {
        self.flags.iter_mut().for_each(|f| *f = false);
    }

    /// Schaltet die gegebenen (bereits aufgelösten) Indizes um.
    pub fn toggle(&mut self, indices: &[usize]) {
        for &i in indices {
            if let Some(flag) = self.flags.get_mut(i) {
                *flag = !*flag;
            }
        }
        self.mirror();
    }

    /// Selektierte Punkte in aufsteigender Reihenfolge.
    pub fn selected_points(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.flags[i]).collect()
    }

    /// Segmente, deren Start- und Endpunkt selektiert sind.
    pub fn selected_segments(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&i| self.flags[i] && self.flags[i + 1])
            .collect()
    }

    /// Punkte, die samt beiden Nachbarn selektiert sind.
    ///
    /// Das sind die inneren Punkte selektierter Läufe; sie können entfernt
    /// werden, ohne die Randpunkte des Laufs anzutasten.
    pub fn selected_inner(&self) -> Vec<usize> {
        let n = self.len();
        (0..n)
            .filter(|&i| self.flags[i] && self.flags[i + 1] && self.flags[(i + n - 1) % n])
            .collect()
    }

    /// Baut die Maske nach dem Einfügen neuer Punkte neu auf.
    ///
    /// `inserted_after[i]` gibt an, ob hinter Punkt `i` ein neuer Punkt mit
    /// dem Flag `flag` eingefügt wurde.
    pub(crate) fn insert_after(&mut self, inserted_after: &[bool], flag: bool) {
        let mut flags = Vec::with_capacity(self.flags.len() + inserted_after.len());
        for (i, &inserted) in inserted_after.iter().enumerate() {
            flags.push(self.flags[i]);
            if inserted {
                flags.push(flag);
            }
        }
        flags.push(false);
        self.flags = flags;
        self.mirror();
    }

    /// Entfernt die markierten Punkte.
    pub(crate) fn remove(&mut self, removed: &[bool]) {
        let mut flags: Vec<bool> = (0..self.len())
            .filter(|&i| !removed[i])
            .map(|i| self.flags[i])
            .collect();
        flags.push(false);
        self.flags = flags;
        self.mirror();
    }
}
