//! Markup landmarks of the catalog pages

/// Element whose presence means search results have rendered
pub const RESULTS_READY_ID: &str = "searchResultsItems";

/// One candidate row on the results page
pub const RESULT_ROW: &str = "#search-body #SliderContainer .movieSearchDetails";
pub const RESULT_LINK: &str = "a";
pub const RESULT_YEAR: &str = ".year";

/// Detail page heading
pub const DETAIL_TITLE: &str = ".title-wrapper h1.title";
pub const DETAIL_YEAR: &str = ".title-wrapper .year";

pub const SYNOPSIS: &str = "p.synopsis";

/// Labeled key/value block holding genres and moods
pub const DETAILS_ID: &str = "mdp-details";
pub const DETAIL_KEY_TAG: &str = "dt";
pub const DETAIL_VALUE_TAG: &str = "dd";
pub const GENRES_KEY: &str = "Genres";
/// The mood heading varies in wording but always starts with this letter
pub const MOODS_KEY_PREFIX: char = 'T';

/// Two-block rating panel, rendered only for signed-in sessions
pub const RATING_PANEL_ID: &str = "ratingInfo";
pub const RATING_BLOCK: &str = "div";
pub const RATING_VALUE: &str = "span";

pub const COVER_IMAGE: &str = "img.boxShotImg";
