//! Numbering-plan validation and normalization.

use phonenumber::{country, Mode};

use crate::error::RegistrationError;

/// Parse `raw` against `region`'s numbering plan and normalize it to E.164.
///
/// The region check runs before the validity check, so a number that
/// resolves to a foreign region is reported as such even when it is also
/// undialable. Numbers that resolve to no region at all fall through to the
/// validity check and come back as invalid.
pub fn normalize(raw: &str, region: country::Id) -> Result<String, RegistrationError> {
    let number = phonenumber::parse(Some(region), raw)
        .map_err(|_| RegistrationError::Unparseable(raw.to_owned()))?;

    match number.country().id() {
        Some(id) if id != region => {
            return Err(RegistrationError::WrongRegion {
                number: raw.to_owned(),
                region: format!("{:?}", region),
            })
        }
        _ => {}
    }

    if !phonenumber::is_valid(&number) {
        return Err(RegistrationError::InvalidNumber(raw.to_owned()));
    }

    Ok(number.format().mode(Mode::E164).to_string())
}
