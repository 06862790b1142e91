use crate::templates::layouts::base_layout;
use maud::{html, Markup, PreEscaped};

// Client-side only: submits events to the capture endpoint and charts the
// listing with the API key kept in local storage.
const DASHBOARD_JS: &str = r#"
const API_KEY = localStorage.getItem('demoApiKey') || 'local-dev-api-key';
const charts = {};

async function fetchNegotiations() {
    const response = await fetch('/loads/negotiations', {
        headers: { 'X-API-Key': API_KEY }
    });
    if (!response.ok) {
        throw new Error('Failed to load negotiations');
    }
    return await response.json();
}

function countBy(values, key) {
    const counts = new Map();
    for (const value of values) {
        const bucket = key(value);
        counts.set(bucket, (counts.get(bucket) || 0) + 1);
    }
    return { labels: Array.from(counts.keys()), data: Array.from(counts.values()) };
}

function histogram(values, binSize) {
    if (!values.length) {
        return { labels: [], data: [] };
    }
    const min = Math.min(...values);
    const max = Math.max(...values);
    if (min === max) {
        return { labels: [`$${min.toFixed(2)}`], data: [values.length] };
    }
    const start = Math.floor(min / binSize) * binSize;
    const end = Math.ceil(max / binSize) * binSize;
    const buckets = [];
    for (let value = start; value <= end; value += binSize) {
        buckets.push({ label: `$${value.toFixed(0)} - $${(value + binSize).toFixed(0)}`, count: 0 });
    }
    for (const value of values) {
        const idx = Math.min(buckets.length - 1, Math.max(0, Math.floor((value - start) / binSize)));
        buckets[idx].count += 1;
    }
    return { labels: buckets.map(b => b.label), data: buckets.map(b => b.count) };
}

function ensureChart(id, type, series, color, axisLabel) {
    if (charts[id]) {
        charts[id].data.labels = series.labels;
        charts[id].data.datasets[0].data = series.data;
        charts[id].update();
        return;
    }
    const ctx = document.getElementById(id).getContext('2d');
    charts[id] = new Chart(ctx, {
        type,
        data: {
            labels: series.labels,
            datasets: [{ label: 'Events', backgroundColor: color, data: series.data }]
        },
        options: {
            scales: {
                y: { beginAtZero: true },
                x: { title: { display: true, text: axisLabel } }
            }
        }
    });
}

function updateCharts(data) {
    const priceDiffs = data.map(item => item.final_price - item.posted_price);
    const finalPrices = data.map(item => item.final_price);

    ensureChart('price-diff-chart', 'bar', histogram(priceDiffs, 100), '#2563eb', 'Price ranges');
    ensureChart('final-price-chart', 'bar', histogram(finalPrices, 100), '#22c55e', 'Price ranges');
    ensureChart('rounds-chart', 'bar',
        countBy(data, item => String(item.total_negotiations)), '#f97316', 'Negotiation rounds');
    ensureChart('sentiment-chart', 'bar',
        countBy(data, item => item.call_sentiment), '#a855f7', 'Sentiment');
    ensureChart('commodity-chart', 'bar',
        countBy(data, item => item.commodity), '#0ea5e9', 'Commodity');
}

async function refreshDashboard() {
    try {
        const filter = document.getElementById('load-filter').value;
        const allData = await fetchNegotiations();
        let filtered = allData;
        if (filter === 'accepted') {
            filtered = allData.filter(item => item.load_accepted);
        } else if (filter === 'rejected') {
            filtered = allData.filter(item => !item.load_accepted);
        }
        updateCharts(filtered);
    } catch (error) {
        console.error(error);
        alert('Unable to refresh dashboard data. Ensure the API key is valid.');
    }
}

document.getElementById('load-filter').addEventListener('change', refreshDashboard);

document.getElementById('negotiation-form').addEventListener('submit', async (event) => {
    event.preventDefault();
    const form = event.currentTarget;
    const status = document.getElementById('form-status');
    status.textContent = 'Submitting…';
    const payload = Object.fromEntries(new FormData(form).entries());

    try {
        const response = await fetch('/loads/negotiations', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json', 'X-API-Key': API_KEY },
            body: JSON.stringify(payload)
        });
        if (!response.ok) {
            throw new Error('Request failed');
        }
        form.reset();
        await refreshDashboard();
        status.textContent = 'Entry saved successfully.';
    } catch (error) {
        status.textContent = 'Unable to save entry. Check the API key and inputs.';
    }
});

refreshDashboard();
"#;

pub fn dashboard_page() -> Markup {
    base_layout(
        "Negotiation Insights Dashboard",
        html! {
            form id="negotiation-form" {
                label { "Load Accepted"
                    select name="load_accepted" required {
                        option value="true" { "Accepted" }
                        option value="false" { "Not Accepted" }
                    }
                }
                label { "Posted Price ($)"
                    input type="text" name="posted_price" placeholder="e.g. 1500" required;
                }
                label { "Final Price ($)"
                    input type="text" name="final_price" placeholder="e.g. 1800" required;
                }
                label { "Total Negotiations"
                    input type="text" name="total_negotiations" placeholder="e.g. 3" required;
                }
                label { "Call Sentiment"
                    select name="call_sentiment" required {
                        option value="positive" { "Positive" }
                        option value="neutral" { "Neutral" }
                        option value="negative" { "Negative" }
                    }
                }
                label { "Commodity"
                    input type="text" name="commodity" placeholder="e.g. Steel" required;
                }
                button type="submit" { "Submit Negotiation" }
                div class="status" id="form-status" {}
            }
            div class="controls" {
                label for="load-filter" { strong { "Show records:" } }
                select id="load-filter" {
                    option value="all" { "All Loads" }
                    option value="accepted" { "Accepted Only" }
                    option value="rejected" { "Not Accepted Only" }
                }
            }
            div class="grid" {
                div class="card" {
                    h2 { "Difference between posted price and final offer" }
                    canvas id="price-diff-chart" aria-label="Price difference chart" {}
                }
                div class="card" {
                    h2 { "Final price" }
                    canvas id="final-price-chart" aria-label="Final price chart" {}
                }
                div class="card" {
                    h2 { "Total number of negotiations" }
                    canvas id="rounds-chart" aria-label="Total negotiations chart" {}
                }
                div class="card" {
                    h2 { "Call sentiment" }
                    canvas id="sentiment-chart" aria-label="Call sentiment chart" {}
                }
                div class="card" {
                    h2 { "Commodity breakdown" }
                    canvas id="commodity-chart" aria-label="Commodity chart" {}
                }
            }
            script { (PreEscaped(DASHBOARD_JS)) }
        },
    )
}
