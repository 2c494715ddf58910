pub mod hit;
pub mod scene;
pub mod svg;

pub use hit::{hit_owner, hit_test};
pub use scene::{Scene, SceneElement};
pub use svg::render_svg;
