//! Category taxonomy seeding

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::SeedConfig,
    error::AppResult,
    models::category::{CategoryUpsert, SeedCategory, SeedSubcategory},
    repository::categories::CategoriesRepository,
};

/// Storage used by seeding
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Create the category, or update it if the id exists
    async fn upsert_category(&self, category: &CategoryUpsert) -> AppResult<()>;
}

#[async_trait]
impl CategoryStore for CategoriesRepository {
    async fn upsert_category(&self, category: &CategoryUpsert) -> AppResult<()> {
        self.upsert(category).await
    }
}

macro_rules! sub {
    ($id:expr, $name:expr, $desc:expr) => {
        SeedSubcategory {
            id: $id,
            name: $name,
            description: $desc,
        }
    };
}

/// Static category taxonomy
pub const TAXONOMY: &[SeedCategory] = &[
    SeedCategory {
        id: "cs",
        name: "Computer Science",
        description: "Theory and practice of computation and information processing",
        subcategories: &[
            sub!("cs.AI", "Artificial Intelligence", "Reasoning, planning, knowledge representation and intelligent agents"),
            sub!("cs.CL", "Computation and Language", "Natural language processing and computational linguistics"),
            sub!("cs.CR", "Cryptography and Security", "Cryptographic protocols, security and privacy"),
            sub!("cs.CV", "Computer Vision", "Image understanding, recognition and visual pattern analysis"),
            sub!("cs.DB", "Databases", "Data management, query processing and storage systems"),
            sub!("cs.DC", "Distributed Computing", "Distributed, parallel and cluster computing"),
            sub!("cs.LG", "Machine Learning", "Learning algorithms, theory and applications"),
            sub!("cs.SE", "Software Engineering", "Design, verification and maintenance of software systems"),
        ],
    },
    SeedCategory {
        id: "math",
        name: "Mathematics",
        description: "Pure and applied mathematics",
        subcategories: &[
            sub!("math.CO", "Combinatorics", "Discrete structures, graph theory and enumeration"),
            sub!("math.OC", "Optimization and Control", "Optimization theory, control and operations research"),
            sub!("math.PR", "Probability", "Probability theory and stochastic processes"),
            sub!("math.ST", "Statistics Theory", "Mathematical foundations of statistics"),
        ],
    },
    SeedCategory {
        id: "physics",
        name: "Physics",
        description: "Physical sciences from particles to the cosmos",
        subcategories: &[
            sub!("physics.comp-ph", "Computational Physics", "Numerical methods and simulation in physics"),
            sub!("quant-ph", "Quantum Physics", "Quantum mechanics, information and computation"),
            sub!("astro-ph", "Astrophysics", "Astronomy, cosmology and astrophysical processes"),
        ],
    },
    SeedCategory {
        id: "q-bio",
        name: "Quantitative Biology",
        description: "Mathematical and computational approaches to biology",
        subcategories: &[
            sub!("q-bio.GN", "Genomics", "Genome analysis and sequencing"),
            sub!("q-bio.NC", "Neurons and Cognition", "Computational neuroscience and cognition"),
        ],
    },
    SeedCategory {
        id: "stat",
        name: "Statistics",
        description: "Statistical methodology and applications",
        subcategories: &[
            sub!("stat.ME", "Methodology", "Design, surveys, inference and modelling methods"),
            sub!("stat.ML", "Machine Learning (Statistics)", "Statistical learning theory and methods"),
        ],
    },
    SeedCategory {
        id: "econ",
        name: "Economics",
        description: "Economic theory, econometrics and applications",
        subcategories: &[
            sub!("econ.EM", "Econometrics", "Statistical methods for economic data"),
            sub!("econ.TH", "Theoretical Economics", "Economic theory and game theory"),
        ],
    },
    SeedCategory {
        id: "eess",
        name: "Electrical Engineering and Systems Science",
        description: "Signal processing, systems and control",
        subcategories: &[
            sub!("eess.SP", "Signal Processing", "Theory and applications of signal processing"),
            sub!("eess.SY", "Systems and Control", "Control systems and automation"),
        ],
    },
];

/// Flatten a taxonomy into upsert rows, each parent followed by its children
pub fn taxonomy_rows(taxonomy: &[SeedCategory]) -> Vec<CategoryUpsert> {
    taxonomy
        .iter()
        .flat_map(|parent| {
            let parent_row = CategoryUpsert {
                id: parent.id.to_string(),
                name: parent.name.to_string(),
                description: parent.description.to_string(),
                parent_id: None,
            };
            let children = parent.subcategories.iter().map(move |child| CategoryUpsert {
                id: child.id.to_string(),
                name: child.name.to_string(),
                description: child.description.to_string(),
                parent_id: Some(parent.id.to_string()),
            });
            std::iter::once(parent_row).chain(children)
        })
        .collect()
}

#[derive(Clone)]
pub struct SeedService {
    store: Arc<dyn CategoryStore>,
    propagate_failures: bool,
}

impl SeedService {
    pub fn new(store: Arc<dyn CategoryStore>, config: &SeedConfig) -> Self {
        Self {
            store,
            propagate_failures: config.propagate_failures,
        }
    }

    /// Ensure the static taxonomy exists.
    ///
    /// Failures are logged and swallowed unless `propagate_failures` is set.
    pub async fn seed(&self) -> AppResult<()> {
        self.seed_taxonomy(TAXONOMY).await
    }

    pub async fn seed_taxonomy(&self, taxonomy: &[SeedCategory]) -> AppResult<()> {
        match self.upsert_all(taxonomy).await {
            Ok(count) => {
                tracing::info!("Seeded {} categories", count);
                Ok(())
            }
            Err(e) if self.propagate_failures => Err(e),
            Err(e) => {
                tracing::error!("Error seeding categories: {}", e);
                Ok(())
            }
        }
    }

    async fn upsert_all(&self, taxonomy: &[SeedCategory]) -> AppResult<usize> {
        let rows = taxonomy_rows(taxonomy);
        for row in &rows {
            self.store.upsert_category(row).await?;
        }
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::category::Category};
    use std::{collections::BTreeMap, sync::Mutex};

    /// In-memory store with the same conflict rules as the SQL upsert
    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<BTreeMap<String, Category>>,
    }

    #[async_trait]
    impl CategoryStore for MemoryStore {
        async fn upsert_category(&self, category: &CategoryUpsert) -> AppResult<()> {
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(&category.id) {
                Some(existing) => {
                    existing.name = category.name.clone();
                    existing.description = category.description.clone();
                    if category.parent_id.is_some() {
                        existing.parent_id = category.parent_id.clone();
                    }
                }
                None => {
                    rows.insert(category.id.clone(), category.clone().into());
                }
            }
            Ok(())
        }
    }

    fn service(store: Arc<dyn CategoryStore>, propagate_failures: bool) -> SeedService {
        SeedService::new(store, &SeedConfig { propagate_failures })
    }

    fn expected_count() -> usize {
        TAXONOMY.iter().map(|c| 1 + c.subcategories.len()).sum()
    }

    #[test]
    fn test_taxonomy_ids_are_unique() {
        let rows = taxonomy_rows(TAXONOMY);
        let mut ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), rows.len());
        assert_eq!(rows.len(), expected_count());
    }

    #[test]
    fn test_parents_precede_children() {
        let rows = taxonomy_rows(TAXONOMY);
        for (idx, row) in rows.iter().enumerate() {
            if let Some(ref parent) = row.parent_id {
                let parent_idx = rows.iter().position(|r| &r.id == parent).unwrap();
                assert!(parent_idx < idx);
                assert!(rows[parent_idx].parent_id.is_none());
            }
        }
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = Arc::new(MemoryStore::default());
        let seeder = service(store.clone(), true);

        seeder.seed().await.unwrap();
        let first = store.rows.lock().unwrap().clone();
        seeder.seed().await.unwrap();
        let second = store.rows.lock().unwrap().clone();

        assert_eq!(first.len(), expected_count());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_children_point_at_parent() {
        let store = Arc::new(MemoryStore::default());
        service(store.clone(), true).seed().await.unwrap();

        let rows = store.rows.lock().unwrap();
        assert_eq!(rows["cs.LG"].parent_id.as_deref(), Some("cs"));
        assert_eq!(rows["quant-ph"].parent_id.as_deref(), Some("physics"));
        assert_eq!(rows["cs"].parent_id, None);
    }

    #[tokio::test]
    async fn test_seed_updates_drifted_rows() {
        let store = Arc::new(MemoryStore::default());
        store.rows.lock().unwrap().insert(
            "cs.AI".to_string(),
            Category {
                id: "cs.AI".into(),
                name: "Old name".into(),
                description: "Old".into(),
                parent_id: Some("math".into()),
            },
        );

        service(store.clone(), true).seed().await.unwrap();

        let rows = store.rows.lock().unwrap();
        assert_eq!(rows["cs.AI"].name, "Artificial Intelligence");
        assert_eq!(rows["cs.AI"].parent_id.as_deref(), Some("cs"));
    }

    #[tokio::test]
    async fn test_failures_are_swallowed_by_default() {
        let mut store = MockCategoryStore::new();
        store
            .expect_upsert_category()
            .times(1)
            .returning(|_| Err(AppError::Internal("connection reset".into())));

        let result = service(Arc::new(store), false).seed().await;
        tokio_test::assert_ok!(result);
    }

    #[tokio::test]
    async fn test_failures_propagate_when_configured() {
        let mut store = MockCategoryStore::new();
        store
            .expect_upsert_category()
            .returning(|_| Err(AppError::Internal("connection reset".into())));

        let result = service(Arc::new(store), true).seed().await;
        tokio_test::assert_err!(result);
    }

    #[tokio::test]
    async fn test_small_taxonomy_order() {
        const SMALL: &[SeedCategory] = &[SeedCategory {
            id: "p",
            name: "Parent",
            description: "",
            subcategories: &[sub!("p.c", "Child", "")],
        }];

        let mut store = MockCategoryStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_upsert_category()
            .withf(|c| c.id == "p" && c.parent_id.is_none())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        store
            .expect_upsert_category()
            .withf(|c| c.id == "p.c" && c.parent_id.as_deref() == Some("p"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        service(Arc::new(store), true)
            .seed_taxonomy(SMALL)
            .await
            .unwrap();
    }
}
