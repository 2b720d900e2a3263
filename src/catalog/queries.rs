//! Built-in taxi trip analyses.
//!
//! SingleStore queries run against `yellow_tripdata_pl_new`, where pickup and
//! dropoff times are stored as epoch microseconds. Druid queries run against the
//! `trips_xaa` datasource and use its `__time` column.

use super::Dialect;

/// One dialect's SQL for an analysis.
#[derive(Debug, Clone, Copy)]
pub(super) struct Translation {
    pub sql: &'static str,
    pub explanation: &'static str,
}

/// A named analysis with its dialect translations.
#[derive(Debug, Clone, Copy)]
pub(super) struct CatalogEntry {
    pub name: &'static str,
    pub singlestore: Translation,
    pub druid: Option<Translation>,
}

impl CatalogEntry {
    pub fn translation(&self, dialect: Dialect) -> Option<&Translation> {
        match dialect {
            Dialect::SingleStore => Some(&self.singlestore),
            Dialect::Druid => self.druid.as_ref(),
        }
    }
}

pub(super) const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Top 10% Earnings",
        singlestore: Translation {
            sql: r#"
WITH earnings AS (
    SELECT
        fare_amount + tip_amount AS total_earnings,
        ROW_NUMBER() OVER (ORDER BY fare_amount + tip_amount DESC) AS earnings_rank,
        COUNT(*) OVER () AS total_count
    FROM yellow_tripdata_pl_new
)
SELECT *
FROM earnings
WHERE earnings_rank <= FLOOR(0.1 * total_count)
LIMIT 50;
"#,
            explanation: "Identifies the top 10% of taxi rides by total earnings (fare plus tip). \
                Ranking with ROW_NUMBER() avoids a PERCENT_RANK() pass over the whole table.",
        },
        druid: Some(Translation {
            sql: r#"
WITH earnings AS (
    SELECT
        (fare_amount + tip_amount) AS total_earnings,
        ROW_NUMBER() OVER (ORDER BY fare_amount + tip_amount DESC) AS earnings_rank,
        COUNT(*) AS total_count
    FROM "trips_xaa"
    GROUP BY fare_amount + tip_amount
)
SELECT *
FROM earnings
WHERE earnings_rank <= FLOOR(0.1 * total_count)
LIMIT 10
"#,
            explanation: "Identifies the top 10% of taxi rides by total earnings, \
                considering both fare_amount and tip_amount.",
        }),
    },
    CatalogEntry {
        name: "Payment Type Dynamics",
        singlestore: Translation {
            sql: r#"
WITH credit_card_avg AS (
    SELECT AVG(tip_amount) AS cc_avg_tip
    FROM yellow_tripdata_pl_new
    WHERE payment_type = 1
)
SELECT
    CASE
        WHEN payment_type = 1 THEN 'Credit card'
        WHEN payment_type = 2 THEN 'Cash'
        WHEN payment_type = 3 THEN 'No charge'
        WHEN payment_type = 4 THEN 'Dispute'
        WHEN payment_type = 5 THEN 'Unknown'
        WHEN payment_type = 6 THEN 'Voided trip'
    END AS payment_type,
    AVG(tip_amount) AS avg_tip,
    COUNT(*) AS trip_count,
    AVG(tip_amount) - cc_avg_tip AS difference,
    (AVG(tip_amount) - cc_avg_tip) / cc_avg_tip * 100 AS percent_change
FROM yellow_tripdata_pl_new, credit_card_avg
GROUP BY payment_type
ORDER BY avg_tip DESC;
"#,
            explanation: "Compares average tip amounts across payment types, with the \
                difference and percent change relative to credit card tips.",
        },
        druid: Some(Translation {
            sql: r#"
SELECT
    'Credit Card' AS payment_type_1,
    CASE
        WHEN p2.payment_type = 1 THEN 'Credit card'
        WHEN p2.payment_type = 2 THEN 'Cash'
        WHEN p2.payment_type = 3 THEN 'No charge'
        WHEN p2.payment_type = 4 THEN 'Dispute'
        WHEN p2.payment_type = 5 THEN 'Unknown'
        WHEN p2.payment_type = 6 THEN 'Voided trip'
    END AS payment_type_2,
    p1.avg_tip_amount AS avg_tip_amount_1,
    p2.avg_tip_amount AS avg_tip_amount_2,
    ABS(p1.avg_tip_amount - p2.avg_tip_amount) AS difference,
    ((p1.avg_tip_amount - p2.avg_tip_amount) / p1.avg_tip_amount * 100) AS percent_change,
    CASE
        WHEN ((p1.avg_tip_amount - p2.avg_tip_amount) / p1.avg_tip_amount * 100) > 50 THEN 'Significantly Higher'
        WHEN p1.avg_tip_amount < p2.avg_tip_amount THEN 'Significantly Lower'
        ELSE 'No Significant Difference'
    END AS comparison_with_other_payment_types
FROM (
    SELECT payment_type, AVG(tip_amount) AS avg_tip_amount
    FROM "trips_xaa"
    WHERE payment_type IN (1, 2, 3, 4, 5, 6)
    GROUP BY payment_type
) AS p1
CROSS JOIN (
    SELECT payment_type, AVG(tip_amount) AS avg_tip_amount
    FROM "trips_xaa"
    WHERE payment_type IN (1, 2, 3, 4, 5, 6)
    GROUP BY payment_type
) AS p2
WHERE p1.payment_type = 1
"#,
            explanation: "Compares average tip amounts across payment types, with the \
                difference and percent change relative to credit card tips.",
        }),
    },
    CatalogEntry {
        name: "Dynamic Pricing Analysis",
        singlestore: Translation {
            sql: r#"
SELECT
    RatecodeID,
    CASE DAYOFWEEK(FROM_UNIXTIME(tpep_pickup_datetime / 1000000))
        WHEN 1 THEN 'Sun'
        WHEN 2 THEN 'Mon'
        WHEN 3 THEN 'Tue'
        WHEN 4 THEN 'Wed'
        WHEN 5 THEN 'Thu'
        WHEN 6 THEN 'Fri'
        WHEN 7 THEN 'Sat'
    END AS day_of_week,
    HOUR(FROM_UNIXTIME(tpep_pickup_datetime / 1000000)) AS hour_of_day,
    AVG(fare_amount / NULLIF(trip_distance, 0)) AS avg_fare_per_mile
FROM yellow_tripdata_pl_new
WHERE trip_distance > 0 AND RatecodeID IS NOT NULL
GROUP BY RatecodeID, day_of_week, hour_of_day
ORDER BY RatecodeID, day_of_week, hour_of_day
LIMIT 20;
"#,
            explanation: "Breaks down the average fare per mile by rate code, day of the \
                week and hour, to inform dynamic pricing and driver scheduling.",
        },
        druid: Some(Translation {
            sql: r#"
SELECT
    RatecodeID,
    CASE
        WHEN int_dy = 1 THEN 'Mon'
        WHEN int_dy = 2 THEN 'Tue'
        WHEN int_dy = 3 THEN 'Wed'
        WHEN int_dy = 4 THEN 'Thu'
        WHEN int_dy = 5 THEN 'Fri'
        WHEN int_dy = 6 THEN 'Sat'
        WHEN int_dy = 7 THEN 'Sun'
    END AS wk_dy,
    "Hour",
    avg_fare_per_mile
FROM (
    SELECT
        "rate_code_id" AS RatecodeID,
        TIME_EXTRACT(__time, 'DOW') AS "int_dy",
        TIME_EXTRACT(__time, 'HOUR') AS "Hour",
        SUM(fare_amount) / SUM(trip_distance) AS avg_fare_per_mile
    FROM "trips_xaa"
    WHERE "rate_code_id" IS NOT NULL
    GROUP BY "rate_code_id", TIME_EXTRACT(__time, 'DOW'), TIME_EXTRACT(__time, 'HOUR')
)
LIMIT 10
"#,
            explanation: "Breaks down the average fare per mile by rate code, day of the \
                week and hour, to inform dynamic pricing and driver scheduling.",
        }),
    },
    CatalogEntry {
        name: "Busiest Hours",
        singlestore: Translation {
            sql: r#"
SELECT
    YEAR(FROM_UNIXTIME(tpep_pickup_datetime / 1000000)) AS Year,
    MONTH(FROM_UNIXTIME(tpep_pickup_datetime / 1000000)) AS Month,
    CASE DAYOFWEEK(FROM_UNIXTIME(tpep_pickup_datetime / 1000000))
        WHEN 1 THEN 'Sun'
        WHEN 2 THEN 'Mon'
        WHEN 3 THEN 'Tue'
        WHEN 4 THEN 'Wed'
        WHEN 5 THEN 'Thu'
        WHEN 6 THEN 'Fri'
        WHEN 7 THEN 'Sat'
    END AS day_of_week,
    HOUR(FROM_UNIXTIME(tpep_pickup_datetime / 1000000)) AS hour_of_day,
    COUNT(*) AS total_trips
FROM yellow_tripdata_pl_new
GROUP BY Year, Month, day_of_week, hour_of_day
ORDER BY total_trips DESC
LIMIT 5;
"#,
            explanation: "Finds the five busiest hours of the week by trip count, for \
                resource allocation, surge pricing and shift planning.",
        },
        druid: Some(Translation {
            sql: r#"
SELECT
    TIME_EXTRACT("__time", 'HOUR') AS hour_of_day,
    COUNT("trip_id") AS total_trips
FROM "trips_xaa"
GROUP BY TIME_EXTRACT("__time", 'HOUR')
ORDER BY COUNT("trip_id") DESC
LIMIT 5
"#,
            explanation: "Finds the five busiest hours of the day by trip count, for \
                resource allocation, surge pricing and shift planning.",
        }),
    },
    CatalogEntry {
        name: "Shortest Path",
        singlestore: Translation {
            sql: r#"
SELECT
    PULocationID,
    DOLocationID,
    MIN(trip_distance) AS shortest_distance,
    AVG(trip_distance) AS avg_distance,
    COUNT(*) AS trip_count
FROM yellow_tripdata_pl_new
GROUP BY PULocationID, DOLocationID
ORDER BY shortest_distance ASC
LIMIT 1;
"#,
            explanation: "Finds the pickup/dropoff zone pair with the shortest recorded \
                trip, alongside the average distance and trip count for that pair.",
        },
        // Not offered on Druid.
        druid: None,
    },
];
