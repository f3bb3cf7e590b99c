//! Script shipped inside the static index document
//!
//! It reads the `#deck-data` snapshot and drives navigation over the
//! pre-rendered report panels. Text is only ever assigned through
//! `textContent`; all markup in the page was escaped when it was rendered.

/// Element id of the embedded snapshot
pub(crate) const DATA_ELEMENT_ID: &str = "deck-data";

pub(crate) const INDEX_RUNTIME: &str = r#"
(function () {
  "use strict";
  var deck = JSON.parse(document.getElementById("deck-data").textContent);
  var list = document.getElementById("report-list");
  var filter = document.getElementById("model-filter");
  var summaryView = document.getElementById("summary-view");
  var detailView = document.getElementById("detail-view");
  var placeholder = document.getElementById("detail-placeholder");
  var summaryButton = document.getElementById("show-summary");
  var detailButton = document.getElementById("show-detail");
  var state = { selected: null, model: "" };

  function show(view) {
    summaryView.hidden = view !== "summary";
    detailView.hidden = view !== "detail";
    summaryButton.classList.toggle("active", view === "summary");
    detailButton.classList.toggle("active", view === "detail");
  }

  function visible(report) {
    return !state.model || report.model === state.model;
  }

  function renderList() {
    while (list.firstChild) {
      list.removeChild(list.firstChild);
    }
    deck.reports.forEach(function (report, index) {
      if (!visible(report)) {
        return;
      }
      var item = document.createElement("li");
      item.textContent = report.title;
      var sub = document.createElement("span");
      sub.className = "sub";
      sub.textContent = report.label + " · " + (report.model || "-");
      item.appendChild(sub);
      if (index === state.selected) {
        item.className = "selected";
      }
      item.addEventListener("click", function () {
        select(index);
        show("detail");
      });
      list.appendChild(item);
    });
  }

  function select(index) {
    state.selected = index;
    var panels = detailView.querySelectorAll(".report-panel");
    for (var i = 0; i < panels.length; i++) {
      panels[i].hidden = Number(panels[i].getAttribute("data-index")) !== index;
    }
    placeholder.hidden = index !== null;
    renderList();
  }

  var models = [];
  deck.reports.forEach(function (report) {
    if (report.model && models.indexOf(report.model) < 0) {
      models.push(report.model);
    }
  });
  models.sort().forEach(function (model) {
    var option = document.createElement("option");
    option.value = model;
    option.textContent = model;
    filter.appendChild(option);
  });

  filter.addEventListener("change", function () {
    state.model = filter.value;
    var current = state.selected === null ? null : deck.reports[state.selected];
    select(current && visible(current) ? state.selected : null);
  });
  summaryButton.addEventListener("click", function () { show("summary"); });
  detailButton.addEventListener("click", function () { show("detail"); });

  select(null);
  show("summary");
})();
"#;
