//! Ephemeral test data for one registration run

use rand::distributions::Alphanumeric;
use rand::Rng;

/// ParaBank rejects usernames longer than this in practice
pub const MAX_USERNAME_LEN: usize = 10;

const USERNAME_PREFIX: &str = "user";
const RANDOM_SUFFIX_LEN: usize = 4;

/// Password shared by the password and confirmation fields
pub const DEFAULT_PASSWORD: &str = "Test@12345";

/// Generate a short, probably-unique username
///
/// `user` + the last five digits of the epoch millis (leading zeros dropped)
/// + four random lowercase alphanumerics, cut to ten characters. Depending on
/// how many digits the timestamp tail has, the cut keeps between one and
/// four random characters. Collisions are unlikely, not impossible.
pub fn generate_username() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    generate_username_with(&mut rand::thread_rng(), millis)
}

pub fn generate_username_with<R: Rng + ?Sized>(rng: &mut R, epoch_millis: u64) -> String {
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| rng.sample(Alphanumeric) as char)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let mut username = format!("{}{}{}", USERNAME_PREFIX, epoch_millis % 100_000, suffix);
    username.truncate(MAX_USERNAME_LEN);
    username
}

/// Values typed into the registration form
#[derive(Debug, Clone, PartialEq)]
pub struct TestData {
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub ssn: String,
    pub username: String,
    pub password: String,
}

impl TestData {
    /// Deterministic customer details around a generated username
    pub fn fixed(username: &str) -> Self {
        Self {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            street: "123 Main Street".to_string(),
            city: "Anytown".to_string(),
            state: "CA".to_string(),
            zip_code: "12345".to_string(),
            phone: "555-123-4567".to_string(),
            ssn: "123-45-6789".to_string(),
            username: username.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }

    /// Randomized customer details
    pub fn fake(username: &str) -> Self {
        use fake::faker::address::en::{CityName, StateAbbr, StreetName, ZipCode};
        use fake::faker::name::en::{FirstName, LastName};
        use fake::Fake;

        let mut rng = rand::thread_rng();
        let house: u16 = rng.gen_range(1..9999);
        let street: String = StreetName().fake();

        Self {
            first_name: FirstName().fake(),
            last_name: LastName().fake(),
            street: format!("{} {}", house, street),
            city: CityName().fake(),
            state: StateAbbr().fake(),
            zip_code: ZipCode().fake(),
            phone: format!(
                "555-{:03}-{:04}",
                rng.gen_range(0..1000),
                rng.gen_range(0..10000)
            ),
            ssn: format!(
                "{:03}-{:02}-{:04}",
                rng.gen_range(100..900),
                rng.gen_range(10..100),
                rng.gen_range(1000..10000)
            ),
            username: username.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}
