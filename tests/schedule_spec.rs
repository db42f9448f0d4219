use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use course_planner::catalog::Catalog;
use course_planner::models::Course;
use course_planner::persistence::{SchedulePersistence, SCHEDULE_KEY};
use course_planner::schedule::{ScheduleStore, Toggled};
use course_planner::storage::{KeyValueStore, MemoryStore, StorageError};
use speculate2::speculate;

fn course(id: &str, department: &str, credits: u32) -> Course {
    Course {
        id: id.to_string(),
        department: department.to_string(),
        course_code: format!("{} {}", department, id),
        title: format!("Course {}", id),
        description: "A course".to_string(),
        credits,
        level: "Undergraduate".to_string(),
        terms: vec!["Fall".to_string(), "Spring".to_string()],
        prerequisites: vec![],
    }
}

fn sample_catalog() -> Catalog {
    Catalog::from_courses(vec![
        course("a", "CS", 3),
        course("b", "MATH", 4),
        course("c", "CS", 2),
    ])
}

fn saved(store: &MemoryStore) -> Vec<Course> {
    let raw = store
        .get(SCHEDULE_KEY)
        .expect("read failed")
        .expect("nothing saved");
    serde_json::from_str(&raw).expect("saved schedule is not a course list")
}

fn ids(courses: &[Course]) -> Vec<&str> {
    courses.iter().map(|c| c.id.as_str()).collect()
}

/// Store whose writes can be switched off.
#[derive(Clone, Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: Arc<AtomicBool>,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Rejected("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}

speculate! {
    before {
        let store = MemoryStore::new();
        let catalog = sample_catalog();
        let mut schedule = ScheduleStore::open(SchedulePersistence::new(store.clone()));
    }

    describe "open" {
        it "starts empty when nothing is saved" {
            assert_eq!(schedule.count(), 0);
            assert_eq!(schedule.total_credits(), 0);
            assert!(schedule.is_empty());
        }

        it "starts empty when the saved value is malformed" {
            store.set(SCHEDULE_KEY, "{not json").unwrap();
            let reopened = ScheduleStore::open(SchedulePersistence::new(store.clone()));
            assert!(reopened.is_empty());
        }

        it "keeps entries that are no longer in the catalog" {
            let stale = course("gone", "HIST", 5);
            schedule.add(&stale).unwrap();

            let reopened = ScheduleStore::open(SchedulePersistence::new(store.clone()));
            assert!(reopened.contains("gone"));
            assert!(catalog.get("gone").is_none());
            assert_eq!(reopened.total_credits(), 5);
        }
    }

    describe "add" {
        it "appends in insertion order" {
            schedule.add(catalog.get("b").unwrap()).unwrap();
            schedule.add(catalog.get("a").unwrap()).unwrap();
            assert_eq!(ids(schedule.courses()), vec!["b", "a"]);
        }

        it "is idempotent" {
            let a = catalog.get("a").unwrap();
            assert!(schedule.add(a).unwrap());
            assert!(!schedule.add(a).unwrap());
            assert_eq!(schedule.count(), 1);
        }

        it "persists the full schedule" {
            schedule.add(catalog.get("a").unwrap()).unwrap();
            schedule.add(catalog.get("b").unwrap()).unwrap();
            assert_eq!(saved(&store), schedule.courses().to_vec());
        }
    }

    describe "remove" {
        it "drops the matching course" {
            schedule.add(catalog.get("a").unwrap()).unwrap();
            schedule.add(catalog.get("b").unwrap()).unwrap();
            assert!(schedule.remove("a").unwrap());
            assert_eq!(ids(schedule.courses()), vec!["b"]);
            assert_eq!(ids(&saved(&store)), vec!["b"]);
        }

        it "is a no-op for an absent id" {
            schedule.add(catalog.get("a").unwrap()).unwrap();
            assert!(!schedule.remove("x").unwrap());
            assert_eq!(ids(schedule.courses()), vec!["a"]);
        }
    }

    describe "toggle" {
        it "adds then removes" {
            let first = schedule.toggle("a", |id| catalog.get(id)).unwrap();
            assert_eq!(first, Toggled::Added);
            assert_eq!(schedule.total_credits(), 3);
            assert_eq!(schedule.count(), 1);

            let second = schedule.toggle("a", |id| catalog.get(id)).unwrap();
            assert_eq!(second, Toggled::Removed);
            assert_eq!(schedule.total_credits(), 0);
            assert!(schedule.is_empty());
        }

        it "twice restores the prior contents" {
            schedule.add(catalog.get("b").unwrap()).unwrap();
            schedule.add(catalog.get("c").unwrap()).unwrap();
            let before = schedule.courses().to_vec();

            for id in ["a", "b"] {
                schedule.toggle(id, |id| catalog.get(id)).unwrap();
                schedule.toggle(id, |id| catalog.get(id)).unwrap();
                assert_eq!(
                    schedule.courses().iter().map(|c| &c.id).collect::<std::collections::BTreeSet<_>>(),
                    before.iter().map(|c| &c.id).collect::<std::collections::BTreeSet<_>>()
                );
            }
        }

        it "ignores ids the catalog cannot resolve" {
            let result = schedule.toggle("nope", |id| catalog.get(id)).unwrap();
            assert_eq!(result, Toggled::Unresolved);
            assert!(schedule.is_empty());
            assert!(store.get(SCHEDULE_KEY).unwrap().is_none());
        }
    }

    describe "clear" {
        it "empties and persists an empty list" {
            schedule.add(catalog.get("a").unwrap()).unwrap();
            schedule.clear().unwrap();
            assert!(schedule.is_empty());
            assert!(saved(&store).is_empty());
        }
    }

    describe "total_credits" {
        it "tracks the sum across adds and removes" {
            schedule.add(catalog.get("a").unwrap()).unwrap();
            schedule.add(catalog.get("b").unwrap()).unwrap();
            schedule.add(catalog.get("c").unwrap()).unwrap();
            assert_eq!(schedule.total_credits(), 9);
            schedule.remove("b").unwrap();
            assert_eq!(schedule.total_credits(), 5);
            let expected: u64 = schedule.courses().iter().map(|c| u64::from(c.credits)).sum();
            assert_eq!(schedule.total_credits(), expected);
        }
    }

    describe "total_credits with large values" {
        it "sums past the u32 range" {
            let big = Catalog::from_courses(vec![
                course("x", "CS", u32::MAX),
                course("y", "CS", u32::MAX),
            ]);
            schedule.add(big.get("x").unwrap()).unwrap();
            schedule.add(big.get("y").unwrap()).unwrap();
            assert_eq!(schedule.total_credits(), 2 * u64::from(u32::MAX));
            assert_eq!(schedule.summary().total_credits, 2 * u64::from(u32::MAX));
        }
    }

    describe "round trip" {
        it "reloads the same contents in the same order" {
            schedule.add(catalog.get("c").unwrap()).unwrap();
            schedule.add(catalog.get("a").unwrap()).unwrap();
            schedule.add(catalog.get("b").unwrap()).unwrap();

            let reopened = ScheduleStore::open(SchedulePersistence::new(store.clone()));
            assert_eq!(reopened.courses(), schedule.courses());
        }
    }

    describe "failed writes" {
        it "leave the schedule unchanged" {
            let flaky = FlakyStore::default();
            let mut schedule = ScheduleStore::open(SchedulePersistence::new(flaky.clone()));
            schedule.add(catalog.get("a").unwrap()).unwrap();
            schedule.add(catalog.get("b").unwrap()).unwrap();

            flaky.fail_writes.store(true, Ordering::SeqCst);

            assert!(schedule.add(catalog.get("c").unwrap()).is_err());
            assert_eq!(ids(schedule.courses()), vec!["a", "b"]);

            assert!(schedule.remove("a").is_err());
            assert_eq!(ids(schedule.courses()), vec!["a", "b"]);

            assert!(schedule.toggle("b", |id| catalog.get(id)).is_err());
            assert_eq!(ids(schedule.courses()), vec!["a", "b"]);

            assert!(schedule.clear().is_err());
            assert_eq!(ids(schedule.courses()), vec!["a", "b"]);
        }
    }
}
