//! View projections.
//!
//! Everything here is a pure function of the state it is handed. A region is
//! always rendered whole; callers re-render it after any change to its inputs.

pub mod html;
mod panel;
pub mod text;

pub use panel::PanelState;

/// `"Showing 1 course"`, `"Showing 3 courses"`.
pub fn count_line(n: usize) -> String {
    format!("Showing {}", quantity(n as u64, "course", "courses"))
}

/// `n` followed by the singular or plural noun.
pub fn quantity(n: u64, singular: &str, plural: &str) -> String {
    format!("{} {}", n, if n == 1 { singular } else { plural })
}

/// Prerequisites joined with `", "`, or `None` when there are none.
pub fn prerequisites_label(prerequisites: &[String]) -> Option<String> {
    if prerequisites.is_empty() {
        None
    } else {
        Some(prerequisites.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_line_singularizes_one() {
        assert_eq!(count_line(0), "Showing 0 courses");
        assert_eq!(count_line(1), "Showing 1 course");
        assert_eq!(count_line(12), "Showing 12 courses");
    }

    #[test]
    fn prerequisites_join_in_order() {
        assert_eq!(prerequisites_label(&[]), None);
        let prereqs = vec!["CS101".to_string(), "MATH120".to_string()];
        assert_eq!(prerequisites_label(&prereqs).as_deref(), Some("CS101, MATH120"));
    }
}
