//! Lenses (filter functions) for the projection stage.
//!
//! A lens maps each point of the cloud to a few real values. Mapper covers
//! the *lens space*, not the data space, so the lens decides which structure
//! the final graph can show: an eccentricity lens separates core from
//! periphery, a density lens separates crowded from sparse regions, a PCA
//! lens follows the directions of largest variance.
//!
//! ## Metric-aware lenses
//!
//! Most lenses first turn the cloud into a pairwise distance matrix under a
//! [`Metric`](crate::Metric), then derive their values from it. With
//! [`Metric::Precomputed`](crate::Metric::Precomputed) the input is taken to
//! be that matrix already.
//!
//! | Lens | Output columns | Default metric |
//! |------|----------------|----------------|
//! | [`Identity`] | selected input columns | none |
//! | [`L1Centrality`] | 1 | Euclidean |
//! | [`LinfCentrality`] | 1 | Euclidean |
//! | [`GaussianDensity`] | 1 | Euclidean |
//! | [`Pca`] | `n_components` | none (raw coordinates) |
//! | [`Mds`] | `n_components` | Euclidean |
//!
//! ## Usage
//!
//! ```rust
//! use nerve::lens::{L1Centrality, Lens, Pca};
//! use ndarray::array;
//!
//! let data = array![[0.0, 0.0], [1.0, 0.5], [2.0, 1.1], [3.0, 1.4]];
//! let ecc = L1Centrality::new().fit_transform(data.view()).unwrap();
//! assert_eq!(ecc.ncols(), 1);
//!
//! let pcs = Pca::new(2).fit_transform(data.view()).unwrap();
//! assert_eq!(pcs.dim(), (4, 2));
//! ```

mod centrality;
mod density;
mod identity;
mod mds;
mod pca;
mod traits;

pub use centrality::{L1Centrality, LinfCentrality};
pub use density::GaussianDensity;
pub use identity::Identity;
pub use mds::Mds;
pub use pca::Pca;
pub use traits::Lens;
