use crossterm::style::Color;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Highlight colors for one pod: the pod name and its container names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    pub pod: Color,
    pub container: Color,
}

/// Pods wrap around and reuse colors after the sixth distinct pod.
pub const PALETTE: [ColorPair; 6] = [
    ColorPair { pod: Color::Cyan, container: Color::DarkCyan },
    ColorPair { pod: Color::Green, container: Color::DarkGreen },
    ColorPair { pod: Color::Magenta, container: Color::DarkMagenta },
    ColorPair { pod: Color::Yellow, container: Color::DarkYellow },
    ColorPair { pod: Color::Blue, container: Color::DarkBlue },
    ColorPair { pod: Color::Red, container: Color::DarkRed },
];

/// Assigns palette slots to pod names in first-seen order.
///
/// One registry is shared by every session in the process. Entries are
/// never evicted.
#[derive(Debug, Default)]
pub struct ColorRegistry {
    pods: Mutex<HashMap<String, usize>>,
}

impl ColorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Palette index for `pod_name`, allocating the next one on first sight.
    pub fn index_for(&self, pod_name: &str) -> usize {
        let mut pods = self.pods.lock();
        if let Some(index) = pods.get(pod_name) {
            return *index;
        }
        let index = pods.len() % PALETTE.len();
        pods.insert(pod_name.to_string(), index);
        index
    }

    pub fn color_for(&self, pod_name: &str) -> ColorPair {
        PALETTE[self.index_for(pod_name)]
    }

    /// Number of distinct pods seen so far.
    pub fn len(&self) -> usize {
        self.pods.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_color_is_stable_per_pod() {
        let registry = ColorRegistry::new();
        let first = registry.color_for("web-1");
        registry.color_for("web-2");
        assert_eq!(registry.color_for("web-1"), first);
        assert_eq!(registry.color_for("web-1"), first);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_first_seen_order() {
        let registry = ColorRegistry::new();
        assert_eq!(registry.index_for("a"), 0);
        assert_eq!(registry.index_for("b"), 1);
        assert_eq!(registry.index_for("a"), 0);
        assert_eq!(registry.index_for("c"), 2);
        assert_eq!(registry.color_for("b"), PALETTE[1]);
    }

    #[test]
    fn test_palette_wraps_after_six_pods() {
        let registry = ColorRegistry::new();
        let indexes: Vec<usize> = (1..=7)
            .map(|i| registry.index_for(&format!("pod-{}", i)))
            .collect();
        assert_eq!(indexes, vec![0, 1, 2, 3, 4, 5, 0]);
        assert_eq!(registry.color_for("pod-7"), registry.color_for("pod-1"));
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_concurrent_first_sight_gets_one_index() {
        let registry = Arc::new(ColorRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.index_for("shared"))
            })
            .collect();
        let indexes: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(indexes.iter().all(|i| *i == indexes[0]));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.index_for("other"), 1);
    }
}
