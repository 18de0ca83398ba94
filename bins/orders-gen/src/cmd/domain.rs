use serde_json::{Map, Value};

use stream_api::{now_ms, timestamp_from_ms};

// ═══════════════════════════════════════════════════════════════
//  RNG (xorshift64)
// ═══════════════════════════════════════════════════════════════

pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: i64) -> Self {
        let state = if seed == 0 {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos() as u64
                | 1 // ensure non-zero
        } else {
            seed as u64
        };
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    pub fn next_intn(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn next_bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        for chunk in out.chunks_mut(8) {
            let word = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
        out
    }
}

// ═══════════════════════════════════════════════════════════════
//  Sample tables
// ═══════════════════════════════════════════════════════════════

const PRODUCT_ADJECTIVES: &[&str] = &[
    "Rustic", "Sleek", "Ergonomic", "Incredible", "Practical", "Refined",
    "Handcrafted", "Modern", "Luxurious", "Durable",
];

const PRODUCT_MATERIALS: &[&str] = &[
    "Steel", "Wooden", "Cotton", "Granite", "Bronze", "Ceramic", "Leather",
    "Bamboo",
];

const PRODUCT_ITEMS: &[&str] = &[
    "Chair", "Table", "Lamp", "Keyboard", "Bottle", "Backpack", "Clock",
    "Notebook", "Speaker", "Kettle",
];

const STREET_NAMES: &[&str] = &[
    "Maple Avenue", "Oak Street", "Cedar Lane", "Elm Drive", "Pine Road",
    "Birch Boulevard", "Willow Court", "Chestnut Way",
];

const CITIES: &[&str] = &[
    "Duluth", "Aurora", "Brighton", "Calgary", "Dresden", "Eindhoven",
    "Fremont", "Granada", "Hobart", "Innsbruck", "Jakarta", "Kyoto",
];

const COUNTRIES: &[&str] = &[
    "Norway", "Japan", "Canada", "Brazil", "Germany", "Australia", "Kenya",
    "Portugal", "Chile", "Thailand", "Iceland", "Vietnam",
];

const TEN_YEARS_MS: u64 = 10 * 365 * 86_400 * 1000;

// ═══════════════════════════════════════════════════════════════
//  Record synthesis
// ═══════════════════════════════════════════════════════════════

/// Synthesize one order record for a logical id.
///
/// Pure in-memory sampling, never fails. Only `id` and the
/// `order_cost == product_price * product_quantity` invariant are
/// deterministic; every other field is sampled per call.
pub fn fake(id: u64, rng: &mut Rng) -> Map<String, Value> {
    let product_quantity = rng.next_intn(2) as u64 + 1;
    let product_price = (rng.next_intn(99_900) + 100) as f64 / 100.0;
    let order_cost = product_price * product_quantity as f64;

    let now = now_ms();
    let order_date = now - rng.next_intn(TEN_YEARS_MS as usize) as i64;

    let order_id = uuid::Builder::from_random_bytes(rng.next_bytes()).into_uuid();
    let product_name = format!(
        "{} {} {}",
        PRODUCT_ADJECTIVES[rng.next_intn(PRODUCT_ADJECTIVES.len())],
        PRODUCT_MATERIALS[rng.next_intn(PRODUCT_MATERIALS.len())],
        PRODUCT_ITEMS[rng.next_intn(PRODUCT_ITEMS.len())],
    );
    let phone_number = format!(
        "{:03}-{:03}-{:04}",
        rng.next_intn(1000),
        rng.next_intn(1000),
        rng.next_intn(10_000),
    );
    let address = format!(
        "{} {}",
        rng.next_intn(9_899) + 100,
        STREET_NAMES[rng.next_intn(STREET_NAMES.len())],
    );

    let mut record = Map::new();
    record.insert("id".into(), Value::from(id));
    record.insert("order_id".into(), Value::from(order_id.to_string()));
    record.insert("customer_id".into(), Value::from(rng.next_intn(99) as u64 + 1));
    record.insert("product_name".into(), Value::from(product_name));
    record.insert("product_quantity".into(), Value::from(product_quantity));
    record.insert("product_price".into(), Value::from(product_price));
    record.insert("phone_number".into(), Value::from(phone_number));
    record.insert("address".into(), Value::from(address));
    record.insert("city".into(), Value::from(CITIES[rng.next_intn(CITIES.len())]));
    record.insert("country".into(), Value::from(COUNTRIES[rng.next_intn(COUNTRIES.len())]));
    record.insert("order_cost".into(), Value::from(order_cost));
    record.insert("order_date".into(), Value::from(timestamp_from_ms(order_date)));
    record.insert("generate_date".into(), Value::from(timestamp_from_ms(now)));
    record
}

/// Partition key of a record: the customer id as text.
pub fn partition_key(record: &Map<String, Value>) -> String {
    match record.get("customer_id") {
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
