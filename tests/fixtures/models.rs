use chrono::NaiveDate;
use rule_rail::AsVariant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pet {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Order {
    pub total: f64,
    pub cost: Option<f64>,
}

impl Order {
    pub fn new(total: f64) -> Self {
        Self { total, cost: None }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Organisation {
    pub name: Option<String>,
    pub email: Option<String>,
    pub headquarters: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactPerson {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: NaiveDate,
}

impl Default for ContactPerson {
    fn default() -> Self {
        Self { name: None, email: None, date_of_birth: NaiveDate::MIN }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Contact {
    Organisation(Organisation),
    Person(ContactPerson),
    #[default]
    Unspecified,
}

impl AsVariant<Organisation> for Contact {
    fn as_variant(&self) -> Option<&Organisation> {
        match self {
            Contact::Organisation(organisation) => Some(organisation),
            _ => None,
        }
    }
}

impl AsVariant<ContactPerson> for Contact {
    fn as_variant(&self) -> Option<&ContactPerson> {
        match self {
            Contact::Person(person) => Some(person),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Person {
    pub surname: Option<String>,
    pub forename: Option<String>,
    pub id: i32,
    pub has_discount: bool,
    pub customer_discount: f64,
    pub postcode: String,
    pub password: String,
    pub password_confirmation: String,
    pub is_preferred_customer: bool,
    pub is_preferred: bool,
    pub credit_card_number: Option<String>,
    pub photo: String,
    pub address_lines: Vec<Option<String>>,
    pub pets: Vec<Pet>,
    pub orders: Vec<Order>,
    pub contact: Contact,
    pub contacts: Vec<Contact>,
}

impl Person {
    /// A person every demo rule accepts.
    pub fn valid() -> Self {
        Self {
            surname: Some("Doe".into()),
            forename: Some("John".into()),
            id: 1,
            postcode: "12345".into(),
            password: "pass".into(),
            password_confirmation: "pass".into(),
            ..Self::default()
        }
    }
}

pub fn pets(count: usize) -> Vec<Pet> {
    (0..count).map(|i| Pet { name: format!("pet-{i}") }).collect()
}

pub fn born(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
