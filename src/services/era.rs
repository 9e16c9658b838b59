/// Checks a release year against one of the frontend's era labels
///
/// The frontend offers a closed set of labels ("Before 1980", "1980–2000",
/// "2000 and later"), so matching is done on the boundary years they contain.
/// A label that mentions neither boundary matches every known year.
/// An unknown year or an empty label never matches.
pub fn in_era(year: Option<i32>, era: &str) -> bool {
    let Some(year) = year else {
        return false;
    };
    if era.is_empty() {
        return false;
    }

    if era.contains("Before 1980") {
        return year < 1980;
    }
    if era.contains("1980") && era.contains("2000") {
        return (1980..=2000).contains(&year);
    }
    if era.contains("2000") {
        return year >= 2000;
    }
    true
}
